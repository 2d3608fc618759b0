use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::dependency_trace::domain::Language;
use crate::dependency_trace::services::ManifestDialect;

/// Trace JVM dependency coordinates and symbol implementations across
/// upstream source repositories
#[derive(Parser, Debug)]
#[command(name = "deptrace")]
#[command(version)]
#[command(about = "Cross-repository dependency resolution and implementation tracing", long_about = None)]
pub struct Args {
    /// Path to a deptrace.config.yml (defaults to auto-discovery in the
    /// current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// GitHub token (overrides config file and GITHUB_TOKEN)
    #[arg(long)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a build manifest and resolve each declared dependency to its
    /// upstream repository
    Analyze {
        /// Path to the manifest file (pom.xml or build.gradle)
        #[arg(short, long)]
        manifest: PathBuf,

        /// Manifest dialect: maven or gradle
        #[arg(short, long, default_value = "maven")]
        dialect: ManifestDialect,

        /// Exit with code 1 when any coordinate stays unmapped
        #[arg(long)]
        strict: bool,
    },

    /// Locate the likely definition of a symbol inside a repository
    Trace {
        /// Repository: owner/repo or a github.com URL
        #[arg(short, long)]
        repo: String,

        /// Symbol reference, e.g. StringUtils.isBlank or ObjectMapper
        #[arg(short, long)]
        symbol: String,

        /// Maximum number of ranked locations
        #[arg(long)]
        top: Option<usize>,

        /// Repository language: java, kotlin, scala, or groovy
        #[arg(short, long, default_value = "java")]
        language: Language,
    },

    /// Recursively expand a symbol's dependency chain across repositories
    Chain {
        /// Repository: owner/repo or a github.com URL
        #[arg(short, long)]
        repo: String,

        /// Symbol reference, e.g. StringUtils.isBlank
        #[arg(short, long)]
        symbol: String,

        /// Maximum expansion depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Abort expansion after this many seconds, returning the partial
        /// chain
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Repository language: java, kotlin, scala, or groovy
        #[arg(short, long, default_value = "java")]
        language: Language,

        /// Exit with code 1 when the chain is truncated or has unresolved
        /// entries
        #[arg(long)]
        strict: bool,
    },
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
