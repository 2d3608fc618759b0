use super::RepoId;
use serde::Serialize;

/// Maximum snippet length carried in a SourceLocation.
pub const MAX_SNIPPET_LEN: usize = 1000;

/// A ranked candidate for where a symbol's implementation lives.
///
/// The confidence score is a bounded ranking value in 0..=100, not a
/// probability; it exists only to order candidates deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub repository: RepoId,
    pub path: String,
    pub line_start: usize,
    pub line_end: usize,
    pub snippet: String,
    pub confidence: u8,
}

impl SourceLocation {
    pub fn new(
        repository: RepoId,
        path: String,
        line_start: usize,
        line_end: usize,
        snippet: String,
        confidence: u8,
    ) -> Self {
        Self {
            repository,
            path,
            line_start,
            line_end,
            snippet: truncate_snippet(snippet),
            confidence: confidence.min(100),
        }
    }
}

fn truncate_snippet(snippet: String) -> String {
    if snippet.len() <= MAX_SNIPPET_LEN {
        return snippet;
    }

    let mut cut = MAX_SNIPPET_LEN;
    while !snippet.is_char_boundary(cut) {
        cut -= 1;
    }
    snippet[..cut].to_string()
}
