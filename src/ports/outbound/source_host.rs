use crate::dependency_trace::domain::RepoId;
use crate::shared::Result;
use async_trait::async_trait;

/// One code-search hit inside a repository.
///
/// `line_number` is 0 when the host's search API does not report line
/// positions; callers must treat 0 as "unknown" and locate the match
/// themselves from the file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub path: String,
    pub line_number: usize,
    pub snippet: String,
}

/// One entry of a repository directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
}

/// SourceHost port abstracting the remote code-hosting service.
///
/// The engine only ever talks to the outside world through this interface;
/// the concrete GitHub adapter (and the test mocks) implement it.
///
/// # Async Support
/// All methods are async and implementations must be `Send + Sync`, since
/// coordinate resolution and symbol search fan out concurrently.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Searches code in a repository, optionally restricted to one file
    /// extension (without the leading dot).
    async fn search_code(
        &self,
        repository: &RepoId,
        query: &str,
        extension: Option<&str>,
    ) -> Result<Vec<SearchHit>>;

    /// Fetches file content. When `line_range` is given as an inclusive
    /// 1-based (start, end) pair, only that window is returned.
    async fn get_file_content(
        &self,
        repository: &RepoId,
        path: &str,
        line_range: Option<(usize, usize)>,
    ) -> Result<String>;

    /// Whether `owner/name` exists on the host.
    async fn repository_exists(&self, owner: &str, name: &str) -> Result<bool>;

    /// Lists one directory level; `path` is "" for the repository root.
    async fn list_directory(&self, repository: &RepoId, path: &str) -> Result<Vec<DirEntry>>;
}
