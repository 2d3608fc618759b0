use crate::dependency_trace::domain::{
    DependencyChainNode, DependencyCoordinate, Resolution, SourceLocation,
};
use crate::dependency_trace::services::{ManifestIssue, UnresolvedEntry};
use crate::ports::outbound::SearchHit;
use serde::Serialize;

/// One analyzed manifest entry: the declared coordinate and where it maps.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedCoordinate {
    pub coordinate: DependencyCoordinate,
    pub resolution: Resolution,
}

/// Response of `analyze_dependencies`: one entry per declared coordinate in
/// declaration order, plus any localized parse issues.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub entries: Vec<AnalyzedCoordinate>,
    pub issues: Vec<ManifestIssue>,
}

impl AnalyzeResponse {
    pub fn unmapped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.resolution.is_mapped())
            .count()
    }
}

/// A call site of the traced symbol in the starting repository.
#[derive(Debug, Clone, Serialize)]
pub struct UsageLocation {
    pub path: String,
    pub line_number: usize,
    pub snippet: String,
}

impl From<SearchHit> for UsageLocation {
    fn from(hit: SearchHit) -> Self {
        Self {
            path: hit.path,
            line_number: hit.line_number,
            snippet: hit.snippet,
        }
    }
}

/// Response of `trace_symbol`: ranked definition candidates plus usage
/// locations in the starting repository.
#[derive(Debug, Clone, Serialize)]
pub struct TraceResponse {
    pub symbol: String,
    pub locations: Vec<SourceLocation>,
    pub usage_locations: Vec<UsageLocation>,
}

/// Response of `build_dependency_chain`.
#[derive(Debug, Clone, Serialize)]
pub struct ChainResponse {
    pub root: DependencyChainNode,
    pub node_count: usize,
    pub deadline_exceeded: bool,
    pub unresolved: Vec<UnresolvedEntry>,
}
