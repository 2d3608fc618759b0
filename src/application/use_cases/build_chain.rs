use crate::application::dto::{ChainRequest, ChainResponse};
use crate::dependency_trace::services::{ChainBuilder, ChainOptions};
use crate::ports::outbound::{ProgressReporter, SourceHost};
use crate::shared::Result;

/// BuildChainUseCase - expands a symbol's multi-hop dependency chain.
///
/// The outcome is always a graph: deadline expiry, cycles, and unmapped
/// coordinates all surface as marked nodes plus an unresolved list, never
/// as a failed call.
pub struct BuildChainUseCase<H: SourceHost, PR> {
    builder: ChainBuilder<H>,
    progress_reporter: PR,
}

impl<H, PR> BuildChainUseCase<H, PR>
where
    H: SourceHost,
    PR: ProgressReporter,
{
    pub fn new(builder: ChainBuilder<H>, progress_reporter: PR) -> Self {
        Self {
            builder,
            progress_reporter,
        }
    }

    pub async fn execute(&self, request: ChainRequest) -> Result<ChainResponse> {
        self.progress_reporter.report(&format!(
            "🔗 Building dependency chain for {} from {} (max depth {})",
            request.symbol, request.repository, request.max_depth
        ));

        let outcome = self
            .builder
            .build_chain(
                request.repository,
                request.symbol,
                ChainOptions {
                    max_depth: request.max_depth,
                    deadline: request.deadline,
                    locate: request.locate,
                },
            )
            .await;

        if outcome.deadline_exceeded {
            self.progress_reporter
                .report_error("⚠️  Warning: deadline exceeded, chain is partial");
        }
        for entry in &outcome.unresolved {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {}: {}",
                entry.subject, entry.reason
            ));
        }

        let node_count = outcome.root.node_count();
        self.progress_reporter.report_completion(&format!(
            "✅ Chain complete: {} node(s), depth {}",
            node_count,
            outcome.root.depth()
        ));

        Ok(ChainResponse {
            root: outcome.root,
            node_count,
            deadline_exceeded: outcome.deadline_exceeded,
            unresolved: outcome.unresolved,
        })
    }
}
