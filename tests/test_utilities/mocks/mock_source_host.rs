use async_trait::async_trait;
use deptrace::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock SourceHost backed by an in-memory world of repositories.
///
/// Each repository may carry files (path -> content) and a list of search
/// hits returned for any query against it.
pub struct MockSourceHost {
    repos: HashMap<String, MockRepo>,
    pub search_calls: AtomicUsize,
    pub exists_calls: AtomicUsize,
}

#[derive(Default)]
pub struct MockRepo {
    pub files: HashMap<String, String>,
    pub hits: Vec<SearchHit>,
}

impl MockSourceHost {
    pub fn new() -> Self {
        Self {
            repos: HashMap::new(),
            search_calls: AtomicUsize::new(0),
            exists_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_repo(mut self, full_name: &str, repo: MockRepo) -> Self {
        self.repos.insert(full_name.to_string(), repo);
        self
    }

    pub fn with_pom(self, full_name: &str, pom: &str) -> Self {
        let mut repo = MockRepo::default();
        repo.files.insert("pom.xml".to_string(), pom.to_string());
        self.with_repo(full_name, repo)
    }
}

impl Default for MockSourceHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceHost for MockSourceHost {
    async fn search_code(
        &self,
        repository: &RepoId,
        _query: &str,
        _extension: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        match self.repos.get(&repository.full_name()) {
            Some(repo) => Ok(repo.hits.clone()),
            None => anyhow::bail!("repository not found: {}", repository),
        }
    }

    async fn get_file_content(
        &self,
        repository: &RepoId,
        path: &str,
        line_range: Option<(usize, usize)>,
    ) -> Result<String> {
        let repo = self
            .repos
            .get(&repository.full_name())
            .ok_or_else(|| anyhow::anyhow!("repository not found: {}", repository))?;
        let content = repo
            .files
            .get(path)
            .ok_or_else(|| anyhow::anyhow!("file not found: {} in {}", path, repository))?;

        match line_range {
            Some((start, end)) => {
                let window: Vec<&str> = content
                    .lines()
                    .skip(start.saturating_sub(1))
                    .take(end.saturating_sub(start) + 1)
                    .collect();
                Ok(window.join("\n"))
            }
            None => Ok(content.clone()),
        }
    }

    async fn repository_exists(&self, owner: &str, name: &str) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.repos.contains_key(&format!("{}/{}", owner, name)))
    }

    async fn list_directory(&self, repository: &RepoId, path: &str) -> Result<Vec<DirEntry>> {
        let repo = self
            .repos
            .get(&repository.full_name())
            .ok_or_else(|| anyhow::anyhow!("repository not found: {}", repository))?;

        if !path.is_empty() {
            anyhow::bail!("mock only lists repository roots");
        }

        Ok(repo
            .files
            .keys()
            .filter(|p| !p.contains('/'))
            .map(|p| DirEntry {
                name: p.clone(),
                path: p.clone(),
                is_dir: false,
            })
            .collect())
    }
}
