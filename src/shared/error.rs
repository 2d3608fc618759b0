use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every requested coordinate resolved and no truncation
    Success = 0,
    /// Some coordinates stayed unmapped or the chain was truncated (only with --strict)
    PartialResolution = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (API error, network error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::PartialResolution => write!(f, "Partial Resolution (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for dependency tracing.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Invalid repository reference: {input}\nReason: {reason}\n\n💡 Hint: Use 'owner/repo' or a full https://github.com/owner/repo URL")]
    InvalidRepository { input: String, reason: String },

    #[error("Invalid symbol reference: {input}\nReason: {reason}\n\n💡 Hint: Use a qualified name such as 'StringUtils.isBlank' or a bare class name")]
    InvalidSymbol { input: String, reason: String },

    #[error("Remote call failed after {attempts} attempt(s): {operation}\nDetails: {details}")]
    RemoteCall {
        operation: String,
        attempts: u32,
        details: String,
    },

    #[error("Deadline of {deadline_secs}s exceeded; remaining expansion was aborted")]
    DeadlineExceeded { deadline_secs: u64 },

    #[error("Failed to read manifest file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    ManifestRead { path: PathBuf, details: String },
}
