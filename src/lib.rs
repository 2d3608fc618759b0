//! deptrace - cross-repository dependency resolution and implementation
//! tracing for JVM build manifests.
//!
//! Given a Maven or Gradle manifest, the engine resolves each declared
//! coordinate to its canonical upstream repository, locates the source
//! definition of a named symbol inside that repository, and expands a
//! bounded, cycle-safe dependency chain across repositories.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture:
//!
//! - **Domain** (`dependency_trace::domain`): coordinates, mappings,
//!   symbols, source locations, chain nodes
//! - **Services** (`dependency_trace::services`): the engine - manifest
//!   parsing, coordinate resolution, symbol location, chain building
//! - **Policies** (`dependency_trace::policies`): the replaceable
//!   candidate-ranking function
//! - **Application** (`application`): use cases wired over injected ports
//! - **Ports** (`ports`): interface definitions for infrastructure
//! - **Adapters** (`adapters`): GitHub REST client, console reporting
//! - **Shared** (`shared`): common error types
//!
//! # Example
//!
//! ```no_run
//! use deptrace::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<()> {
//! let host = Arc::new(GitHubSourceHost::new(GitHubHostConfig::default())?);
//! let resolver = Arc::new(CoordinateResolver::new(
//!     host.clone(),
//!     CoordinateResolver::<GitHubSourceHost>::default_rules(),
//!     Duration::from_secs(600),
//! ));
//!
//! let use_case = AnalyzeDependenciesUseCase::new(resolver, StderrProgressReporter::new());
//! let manifest = std::fs::read_to_string("pom.xml")?;
//! let response = use_case
//!     .execute(AnalyzeRequest::new(manifest, ManifestDialect::Maven))
//!     .await?;
//!
//! for entry in &response.entries {
//!     println!("{} -> {:?}", entry.coordinate, entry.resolution);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cache;
pub mod cli;
pub mod config;
pub mod dependency_trace;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::network::{GitHubHostConfig, GitHubSourceHost};
    pub use crate::application::dto::{
        AnalyzeRequest, AnalyzeResponse, AnalyzedCoordinate, ChainRequest, ChainResponse,
        TraceRequest, TraceResponse, UsageLocation,
    };
    pub use crate::application::use_cases::{
        AnalyzeDependenciesUseCase, BuildChainUseCase, TraceSymbolUseCase,
    };
    pub use crate::cache::ResultCache;
    pub use crate::dependency_trace::domain::{
        DependencyChainNode, DependencyCoordinate, Language, MappingOrigin, MappingRule,
        NodeState, RepoId, RepositoryMapping, Resolution, SourceLocation, SymbolKind,
        SymbolReference,
    };
    pub use crate::dependency_trace::services::{
        ChainBuilder, ChainOptions, CoordinateResolver, LocateOptions, ManifestDialect,
        ManifestParser, SymbolLocator,
    };
    pub use crate::ports::outbound::{DirEntry, ProgressReporter, SearchHit, SourceHost};
    pub use crate::shared::Result;
}
