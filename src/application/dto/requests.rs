use crate::dependency_trace::domain::{RepoId, SymbolReference};
use crate::dependency_trace::services::{LocateOptions, ManifestDialect};
use std::time::Duration;

/// Request to analyze one build manifest's declared dependencies.
#[derive(Debug, Clone)]
pub struct AnalyzeRequest {
    pub manifest_text: String,
    pub dialect: ManifestDialect,
}

impl AnalyzeRequest {
    pub fn new(manifest_text: String, dialect: ManifestDialect) -> Self {
        Self {
            manifest_text,
            dialect,
        }
    }
}

/// Request to trace one symbol's implementation inside a repository.
#[derive(Debug, Clone)]
pub struct TraceRequest {
    pub repository: RepoId,
    pub symbol: SymbolReference,
    pub options: LocateOptions,
}

impl TraceRequest {
    pub fn new(repository: RepoId, symbol: SymbolReference, options: LocateOptions) -> Self {
        Self {
            repository,
            symbol,
            options,
        }
    }
}

/// Request to build a bounded dependency chain for a symbol.
#[derive(Debug, Clone)]
pub struct ChainRequest {
    pub repository: RepoId,
    pub symbol: SymbolReference,
    pub max_depth: usize,
    pub deadline: Option<Duration>,
    pub locate: LocateOptions,
}

impl ChainRequest {
    pub fn new(
        repository: RepoId,
        symbol: SymbolReference,
        max_depth: usize,
        deadline: Option<Duration>,
        locate: LocateOptions,
    ) -> Self {
        Self {
            repository,
            symbol,
            max_depth,
            deadline,
            locate,
        }
    }
}
