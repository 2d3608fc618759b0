use crate::application::dto::{AnalyzeRequest, AnalyzeResponse, AnalyzedCoordinate};
use crate::dependency_trace::services::{CoordinateResolver, ManifestParser};
use crate::ports::outbound::{ProgressReporter, SourceHost};
use crate::shared::Result;
use std::sync::Arc;

/// AnalyzeDependenciesUseCase - parses a manifest and resolves every
/// declared coordinate to its upstream repository.
///
/// Resolutions run concurrently (the source host adapter enforces the
/// global in-flight cap); the response preserves declaration order and a
/// single unmapped coordinate never fails the call.
pub struct AnalyzeDependenciesUseCase<H: SourceHost, PR> {
    resolver: Arc<CoordinateResolver<H>>,
    progress_reporter: PR,
}

impl<H, PR> AnalyzeDependenciesUseCase<H, PR>
where
    H: SourceHost,
    PR: ProgressReporter,
{
    pub fn new(resolver: Arc<CoordinateResolver<H>>, progress_reporter: PR) -> Self {
        Self {
            resolver,
            progress_reporter,
        }
    }

    pub async fn execute(&self, request: AnalyzeRequest) -> Result<AnalyzeResponse> {
        self.progress_reporter.report(&format!(
            "📖 Parsing {} manifest ({} bytes)",
            request.dialect,
            request.manifest_text.len()
        ));

        let scan = ManifestParser::parse(&request.manifest_text, request.dialect);

        for issue in &scan.issues {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} manifest line {}: {}",
                issue.dialect, issue.line, issue.details
            ));
        }

        self.progress_reporter.report(&format!(
            "✅ Found {} declared dependenc{}",
            scan.coordinates.len(),
            if scan.coordinates.len() == 1 { "y" } else { "ies" }
        ));

        if !scan.coordinates.is_empty() {
            self.progress_reporter
                .report("🔍 Resolving upstream repositories...");
        }

        let total = scan.coordinates.len();
        let resolutions = futures::future::join_all(
            scan.coordinates
                .iter()
                .enumerate()
                .map(|(index, coordinate)| {
                    let resolver = self.resolver.clone();
                    async move {
                        let resolution = resolver.resolve(coordinate).await;
                        (index, resolution)
                    }
                }),
        )
        .await;

        let mut entries: Vec<AnalyzedCoordinate> = scan
            .coordinates
            .iter()
            .cloned()
            .map(|coordinate| AnalyzedCoordinate {
                coordinate,
                resolution: crate::dependency_trace::domain::Resolution::Unmapped,
            })
            .collect();
        for (index, resolution) in resolutions {
            entries[index].resolution = resolution;
            self.progress_reporter
                .report_progress(index + 1, total, Some("resolving coordinates"));
        }

        let response = AnalyzeResponse {
            entries,
            issues: scan.issues,
        };

        let mapped = response.entries.len() - response.unmapped_count();
        self.progress_reporter.report_completion(&format!(
            "✅ Resolution complete: {} mapped, {} unmapped",
            mapped,
            response.unmapped_count()
        ));

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency_trace::domain::RepoId;
    use crate::dependency_trace::services::ManifestDialect;
    use crate::ports::outbound::{DirEntry, SearchHit};
    use async_trait::async_trait;
    use std::time::Duration;

    struct NoHost;

    #[async_trait]
    impl SourceHost for NoHost {
        async fn search_code(
            &self,
            _repository: &RepoId,
            _query: &str,
            _extension: Option<&str>,
        ) -> Result<Vec<SearchHit>> {
            Ok(vec![])
        }

        async fn get_file_content(
            &self,
            _repository: &RepoId,
            _path: &str,
            _line_range: Option<(usize, usize)>,
        ) -> Result<String> {
            anyhow::bail!("offline")
        }

        async fn repository_exists(&self, _owner: &str, _name: &str) -> Result<bool> {
            anyhow::bail!("offline")
        }

        async fn list_directory(
            &self,
            _repository: &RepoId,
            _path: &str,
        ) -> Result<Vec<DirEntry>> {
            anyhow::bail!("offline")
        }
    }

    struct SilentReporter;

    impl ProgressReporter for SilentReporter {
        fn report(&self, _message: &str) {}
        fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
        fn report_error(&self, _message: &str) {}
        fn report_completion(&self, _message: &str) {}
    }

    fn use_case() -> AnalyzeDependenciesUseCase<NoHost, SilentReporter> {
        let resolver = Arc::new(CoordinateResolver::new(
            Arc::new(NoHost),
            CoordinateResolver::<NoHost>::default_rules(),
            Duration::from_secs(300),
        ));
        AnalyzeDependenciesUseCase::new(resolver, SilentReporter)
    }

    const POM: &str = r#"<project>
<dependencies>
<dependency>
    <groupId>org.apache.commons</groupId>
    <artifactId>commons-lang3</artifactId>
    <version>3.12.0</version>
</dependency>
<dependency>
    <groupId>com.unknown.internal</groupId>
    <artifactId>proprietary-lib</artifactId>
    <version>1.0</version>
</dependency>
</dependencies>
</project>"#;

    #[tokio::test]
    async fn test_one_entry_per_declared_coordinate_in_order() {
        let response = use_case()
            .execute(AnalyzeRequest::new(POM.to_string(), ManifestDialect::Maven))
            .await
            .unwrap();

        assert_eq!(response.entries.len(), 2);
        assert_eq!(response.entries[0].coordinate.artifact(), "commons-lang3");
        assert_eq!(response.entries[1].coordinate.artifact(), "proprietary-lib");
    }

    #[tokio::test]
    async fn test_unmapped_coordinate_does_not_fail_analysis() {
        let response = use_case()
            .execute(AnalyzeRequest::new(POM.to_string(), ManifestDialect::Maven))
            .await
            .unwrap();

        // table hit resolves without network; unknown coordinate stays
        // unmapped because the offline host disqualifies every candidate
        assert!(response.entries[0].resolution.is_mapped());
        assert!(!response.entries[1].resolution.is_mapped());
        assert_eq!(response.unmapped_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_manifest_reports_issue() {
        let response = use_case()
            .execute(AnalyzeRequest::new(
                "not a manifest".to_string(),
                ManifestDialect::Maven,
            ))
            .await
            .unwrap();

        assert!(response.entries.is_empty());
        assert_eq!(response.issues.len(), 1);
    }
}
