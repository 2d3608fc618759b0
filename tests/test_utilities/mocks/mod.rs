mod mock_progress_reporter;
mod mock_source_host;

pub use mock_progress_reporter::MockProgressReporter;
pub use mock_source_host::{MockRepo, MockSourceHost};
