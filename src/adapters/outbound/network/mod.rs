/// Network adapters for external API calls
mod github_host;

pub use github_host::{GitHubHostConfig, GitHubSourceHost};
