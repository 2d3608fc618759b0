/// Domain value objects for dependency tracing.
pub mod chain;
pub mod coordinate;
pub mod repository;
pub mod source_location;
pub mod symbol;

pub use chain::{DependencyChainNode, NodeState};
pub use coordinate::{DependencyCoordinate, PLACEHOLDER_VERSION};
pub use repository::{MappingOrigin, MappingRule, RepoId, RepositoryMapping, Resolution};
pub use source_location::SourceLocation;
pub use symbol::{Language, SymbolKind, SymbolReference};
