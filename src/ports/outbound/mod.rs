/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (source host, console).
pub mod progress_reporter;
pub mod source_host;

pub use progress_reporter::ProgressReporter;
pub use source_host::{DirEntry, SearchHit, SourceHost};
