/// Engine services: manifest parsing, coordinate resolution, symbol
/// location, and chain building.
pub mod chain_builder;
pub mod coordinate_resolver;
pub mod manifest_parser;
pub mod symbol_locator;

pub use chain_builder::{ChainBuilder, ChainOptions, ChainOutcome, UnresolvedEntry};
pub use coordinate_resolver::CoordinateResolver;
pub use manifest_parser::{ManifestDialect, ManifestIssue, ManifestParser, ManifestScan};
pub use symbol_locator::{LocateOptions, SymbolLocator};
