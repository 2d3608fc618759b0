use crate::dependency_trace::domain::RepoId;
use crate::ports::outbound::{DirEntry, SearchHit, SourceHost};
use crate::shared::error::TraceError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Tuning for the GitHub adapter.
#[derive(Debug, Clone)]
pub struct GitHubHostConfig {
    pub token: Option<String>,
    pub request_timeout: Duration,
    pub max_retries: u32,
    /// Global cap on simultaneous in-flight API calls
    pub max_concurrent_requests: usize,
    pub api_base: String,
}

impl Default for GitHubHostConfig {
    fn default() -> Self {
        Self {
            token: None,
            request_timeout: Duration::from_secs(10),
            max_retries: 3,
            max_concurrent_requests: 8,
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// GitHub REST adapter implementing the SourceHost port.
///
/// Every call goes through one shared semaphore so the whole engine never
/// exceeds the configured number of in-flight requests, and transient
/// failures (HTTP 429, 5xx, timeouts) are retried with exponential backoff
/// up to the configured budget. Other failures are returned immediately and
/// stay scoped to the one operation that hit them.
pub struct GitHubSourceHost {
    client: reqwest::Client,
    config: GitHubHostConfig,
    limiter: Arc<Semaphore>,
}

const BACKOFF_BASE_MS: u64 = 250;
const SEARCH_PAGE_SIZE: usize = 20;

impl GitHubSourceHost {
    pub fn new(config: GitHubHostConfig) -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("deptrace/{}", version);
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(user_agent)
            .build()?;

        let limiter = Arc::new(Semaphore::new(config.max_concurrent_requests.max(1)));

        Ok(Self {
            client,
            config,
            limiter,
        })
    }

    /// Sends one GET with the global concurrency cap and retry budget
    /// applied. Retries on 429, 5xx, and timeouts; everything else fails
    /// fast.
    async fn send_with_retry(
        &self,
        operation: &str,
        url: &str,
        accept: &str,
    ) -> Result<reqwest::Response> {
        let mut last_error = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let backoff = BACKOFF_BASE_MS * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let _permit = self
                .limiter
                .acquire()
                .await
                .expect("request limiter is never closed");

            let mut request = self.client.get(url).header("Accept", accept);
            if let Some(token) = &self.config.token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() || status.as_u16() == 404 {
                        return Ok(response);
                    }
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_error = format!("status {}", status);
                        continue;
                    }
                    return Err(TraceError::RemoteCall {
                        operation: operation.to_string(),
                        attempts: attempt + 1,
                        details: format!("status {}", status),
                    }
                    .into());
                }
                Err(e) if e.is_timeout() => {
                    last_error = "request timed out".to_string();
                    continue;
                }
                Err(e) => {
                    return Err(TraceError::RemoteCall {
                        operation: operation.to_string(),
                        attempts: attempt + 1,
                        details: e.to_string(),
                    }
                    .into());
                }
            }
        }

        Err(TraceError::RemoteCall {
            operation: operation.to_string(),
            attempts: self.config.max_retries + 1,
            details: last_error,
        }
        .into())
    }
}

#[async_trait]
impl SourceHost for GitHubSourceHost {
    async fn search_code(
        &self,
        repository: &RepoId,
        query: &str,
        extension: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        let mut q = format!("{} repo:{}", query, repository.full_name());
        if let Some(ext) = extension {
            q.push_str(&format!(" extension:{}", ext.trim_start_matches('.')));
        }

        let url = format!(
            "{}/search/code?q={}&per_page={}",
            self.config.api_base,
            urlencoding::encode(&q),
            SEARCH_PAGE_SIZE
        );

        // text-match media type adds matched fragments to each item
        let response = self
            .send_with_retry("search_code", &url, "application/vnd.github.text-match+json")
            .await?;

        if response.status().as_u16() == 404 {
            return Ok(vec![]);
        }

        let body: SearchResponse = response.json().await?;

        Ok(body
            .items
            .into_iter()
            .map(|item| SearchHit {
                path: item.path,
                // the search API reports fragments, not line positions
                line_number: 0,
                snippet: item
                    .text_matches
                    .into_iter()
                    .next()
                    .map(|m| m.fragment)
                    .unwrap_or_default(),
            })
            .collect())
    }

    async fn get_file_content(
        &self,
        repository: &RepoId,
        path: &str,
        line_range: Option<(usize, usize)>,
    ) -> Result<String> {
        validate_path_component(path)?;

        let url = format!(
            "{}/repos/{}/contents/{}",
            self.config.api_base,
            repository.full_name(),
            path.trim_start_matches('/')
        );

        // raw media type avoids the base64 JSON envelope
        let response = self
            .send_with_retry("get_file_content", &url, "application/vnd.github.raw")
            .await?;

        if response.status().as_u16() == 404 {
            anyhow::bail!("file not found: {} in {}", path, repository);
        }

        let content = response.text().await?;

        // The contents API has no range parameter; windows are cut here.
        match line_range {
            Some((start, end)) => {
                let window: Vec<&str> = content
                    .lines()
                    .skip(start.saturating_sub(1))
                    .take(end.saturating_sub(start) + 1)
                    .collect();
                Ok(window.join("\n"))
            }
            None => Ok(content),
        }
    }

    async fn repository_exists(&self, owner: &str, name: &str) -> Result<bool> {
        let url = format!("{}/repos/{}/{}", self.config.api_base, owner, name);
        let response = self
            .send_with_retry("repository_exists", &url, "application/vnd.github+json")
            .await?;
        Ok(response.status().is_success())
    }

    async fn list_directory(&self, repository: &RepoId, path: &str) -> Result<Vec<DirEntry>> {
        validate_path_component(path)?;

        let url = format!(
            "{}/repos/{}/contents/{}",
            self.config.api_base,
            repository.full_name(),
            path.trim_start_matches('/')
        );

        let response = self
            .send_with_retry("list_directory", &url, "application/vnd.github+json")
            .await?;

        if response.status().as_u16() == 404 {
            anyhow::bail!("path not found: '{}' in {}", path, repository);
        }

        let entries: Vec<ContentsEntry> = response.json().await?;

        Ok(entries
            .into_iter()
            .map(|entry| DirEntry {
                is_dir: entry.entry_type == "dir",
                name: entry.name,
                path: entry.path,
            })
            .collect())
    }
}

/// Rejects path inputs that could escape the repository or smuggle query
/// parameters into the request URL.
fn validate_path_component(path: &str) -> Result<()> {
    if path.contains("..") {
        anyhow::bail!("Security: path contains '..' which is not allowed");
    }
    if path.contains('?') || path.contains('#') || path.contains('\\') {
        anyhow::bail!("Security: path contains URL-unsafe characters");
    }
    Ok(())
}

// GitHub API response structures

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    path: String,
    #[serde(default)]
    text_matches: Vec<TextMatch>,
}

#[derive(Debug, Deserialize)]
struct TextMatch {
    #[serde(default)]
    fragment: String,
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    entry_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_creation() {
        let host = GitHubSourceHost::new(GitHubHostConfig::default());
        assert!(host.is_ok());
    }

    #[test]
    fn test_validate_path_rejects_traversal() {
        assert!(validate_path_component("src/../../../etc/passwd").is_err());
        assert!(validate_path_component("src/main?x=1").is_err());
        assert!(validate_path_component("src\\main").is_err());
        assert!(validate_path_component("src/main/java/App.java").is_ok());
        assert!(validate_path_component("").is_ok());
    }

    #[test]
    fn test_search_response_deserialize() {
        let json = r#"{
            "total_count": 1,
            "items": [
                {
                    "name": "StringUtils.java",
                    "path": "src/main/java/StringUtils.java",
                    "text_matches": [
                        {"fragment": "public static boolean isBlank(final CharSequence cs) {"}
                    ]
                }
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].path, "src/main/java/StringUtils.java");
        assert!(parsed.items[0].text_matches[0].fragment.contains("isBlank"));
    }

    #[test]
    fn test_search_response_without_text_matches() {
        let json = r#"{"total_count": 1, "items": [{"name": "A.java", "path": "A.java"}]}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.items[0].text_matches.is_empty());
    }

    #[test]
    fn test_contents_entry_deserialize() {
        let json = r#"[
            {"name": "pom.xml", "path": "pom.xml", "type": "file"},
            {"name": "src", "path": "src", "type": "dir"}
        ]"#;
        let entries: Vec<ContentsEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].entry_type, "file");
        assert_eq!(entries[1].entry_type, "dir");
    }

    // Integration tests - require network access and a GITHUB_TOKEN
    // Uncomment to run against the real API
    // #[tokio::test]
    // async fn test_repository_exists_real() {
    //     let config = GitHubHostConfig {
    //         token: std::env::var("GITHUB_TOKEN").ok(),
    //         ..GitHubHostConfig::default()
    //     };
    //     let host = GitHubSourceHost::new(config).unwrap();
    //     assert!(host.repository_exists("apache", "commons-lang").await.unwrap());
    //     assert!(!host
    //         .repository_exists("apache", "definitely-not-a-repo-xyz")
    //         .await
    //         .unwrap());
    // }
}
