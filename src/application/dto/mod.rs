/// Request and response DTOs for the application use cases.
pub mod requests;
pub mod responses;

pub use requests::{AnalyzeRequest, ChainRequest, TraceRequest};
pub use responses::{
    AnalyzeResponse, AnalyzedCoordinate, ChainResponse, TraceResponse, UsageLocation,
};
