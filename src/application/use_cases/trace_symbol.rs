use crate::application::dto::{TraceRequest, TraceResponse, UsageLocation};
use crate::dependency_trace::services::SymbolLocator;
use crate::ports::outbound::{ProgressReporter, SourceHost};
use crate::shared::Result;
use std::sync::Arc;

/// Usage hits reported alongside the ranked definitions.
const MAX_USAGE_LOCATIONS: usize = 5;

/// TraceSymbolUseCase - locates a symbol's likely definition inside a
/// repository and reports where the repository itself uses it.
///
/// An empty location list is a normal outcome; only a failed search (after
/// the adapter's retry budget) is an error, and the usage search failing
/// never fails the trace.
pub struct TraceSymbolUseCase<H: SourceHost, PR> {
    host: Arc<H>,
    locator: Arc<SymbolLocator<H>>,
    progress_reporter: PR,
}

impl<H, PR> TraceSymbolUseCase<H, PR>
where
    H: SourceHost,
    PR: ProgressReporter,
{
    pub fn new(host: Arc<H>, locator: Arc<SymbolLocator<H>>, progress_reporter: PR) -> Self {
        Self {
            host,
            locator,
            progress_reporter,
        }
    }

    pub async fn execute(&self, request: TraceRequest) -> Result<TraceResponse> {
        self.progress_reporter.report(&format!(
            "🔎 Tracing {} in {}",
            request.symbol, request.repository
        ));

        let locations = self
            .locator
            .locate(&request.repository, &request.symbol, &request.options)
            .await?;

        if locations.is_empty() {
            self.progress_reporter
                .report("   No plausible definition found");
        } else {
            self.progress_reporter.report(&format!(
                "   Best candidate: {} (confidence {})",
                locations[0].path, locations[0].confidence
            ));
        }

        let usage_locations = self.search_usages(&request).await;

        self.progress_reporter.report_completion(&format!(
            "✅ Trace complete: {} candidate location(s), {} usage site(s)",
            locations.len(),
            usage_locations.len()
        ));

        Ok(TraceResponse {
            symbol: request.symbol.qualified_name().to_string(),
            locations,
            usage_locations,
        })
    }

    /// Finds call sites of the bare symbol name in the starting repository.
    /// Best-effort: a failure here degrades to an empty list.
    async fn search_usages(&self, request: &TraceRequest) -> Vec<UsageLocation> {
        let extension = request.options.language.extension();
        match self
            .host
            .search_code(
                &request.repository,
                request.symbol.simple_name(),
                Some(extension),
            )
            .await
        {
            Ok(hits) => hits
                .into_iter()
                .take(MAX_USAGE_LOCATIONS)
                .map(UsageLocation::from)
                .collect(),
            Err(e) => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: usage search failed for {}: {}",
                    request.symbol, e
                ));
                Vec::new()
            }
        }
    }
}
