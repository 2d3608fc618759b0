use deptrace::adapters::outbound::console::StderrProgressReporter;
use deptrace::adapters::outbound::network::{GitHubHostConfig, GitHubSourceHost};
use deptrace::application::dto::{AnalyzeRequest, ChainRequest, TraceRequest};
use deptrace::application::use_cases::{
    AnalyzeDependenciesUseCase, BuildChainUseCase, TraceSymbolUseCase,
};
use deptrace::cli::{Args, Command};
use deptrace::config::{self, ConfigFile};
use deptrace::dependency_trace::domain::{RepoId, SymbolReference};
use deptrace::dependency_trace::services::{
    ChainBuilder, CoordinateResolver, LocateOptions, SymbolLocator,
};
use deptrace::shared::error::{ExitCode, TraceError};
use deptrace::shared::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "❌ An error occurred:".red().bold());
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!();
                eprintln!("Caused by: {}", cause);
            }

            eprintln!();
            ExitCode::ApplicationError
        }
    };

    process::exit(exit_code.as_i32());
}

async fn run() -> Result<ExitCode> {
    let args = Args::parse_args();

    let config = load_config(&args)?;
    let settings = config.settings();
    let token = args
        .token
        .clone()
        .or_else(|| config.github_token.clone())
        .or_else(|| std::env::var("GITHUB_TOKEN").ok());

    // Create adapters (Dependency Injection)
    let host = Arc::new(GitHubSourceHost::new(GitHubHostConfig {
        token,
        request_timeout: settings.request_timeout,
        max_retries: settings.max_retries,
        max_concurrent_requests: settings.max_concurrent_requests,
        ..GitHubHostConfig::default()
    })?);

    // Configured mappings take precedence over the built-in table
    let mut rules = config.mapping_rules()?;
    rules.extend(CoordinateResolver::<GitHubSourceHost>::default_rules());

    let resolver = Arc::new(CoordinateResolver::new(
        host.clone(),
        rules,
        settings.cache_ttl,
    ));
    let locator = Arc::new(SymbolLocator::new(host.clone(), settings.cache_ttl));

    match args.command {
        Command::Analyze {
            manifest,
            dialect,
            strict,
        } => {
            let manifest_text =
                std::fs::read_to_string(&manifest).map_err(|e| TraceError::ManifestRead {
                    path: manifest.clone(),
                    details: e.to_string(),
                })?;

            let use_case =
                AnalyzeDependenciesUseCase::new(resolver, StderrProgressReporter::new());
            let response = use_case
                .execute(AnalyzeRequest::new(manifest_text, dialect))
                .await?;

            println!("{}", serde_json::to_string_pretty(&response)?);

            if strict && response.unmapped_count() > 0 {
                return Ok(ExitCode::PartialResolution);
            }
            Ok(ExitCode::Success)
        }

        Command::Trace {
            repo,
            symbol,
            top,
            language,
        } => {
            let repository = RepoId::parse(&repo)?;
            let symbol = SymbolReference::parse(&symbol)?;
            let options = LocateOptions {
                top_n: top.unwrap_or(settings.top_n),
                language,
                ..LocateOptions::default()
            };

            let use_case =
                TraceSymbolUseCase::new(host, locator, StderrProgressReporter::new());
            let response = use_case
                .execute(TraceRequest::new(repository, symbol, options))
                .await?;

            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::Success)
        }

        Command::Chain {
            repo,
            symbol,
            max_depth,
            timeout_secs,
            language,
            strict,
        } => {
            let repository = RepoId::parse(&repo)?;
            let symbol = SymbolReference::parse(&symbol)?;
            let locate = LocateOptions {
                top_n: settings.top_n,
                language,
                ..LocateOptions::default()
            };

            let builder = ChainBuilder::new(host, resolver, locator);
            let use_case = BuildChainUseCase::new(builder, StderrProgressReporter::new());
            let response = use_case
                .execute(ChainRequest::new(
                    repository,
                    symbol,
                    max_depth.unwrap_or(settings.max_depth),
                    timeout_secs.map(Duration::from_secs),
                    locate,
                ))
                .await?;

            println!("{}", serde_json::to_string_pretty(&response)?);

            if strict && (response.deadline_exceeded || !response.unresolved.is_empty()) {
                return Ok(ExitCode::PartialResolution);
            }
            Ok(ExitCode::Success)
        }
    }
}

fn load_config(args: &Args) -> Result<ConfigFile> {
    match &args.config {
        Some(path) => config::load_config_from_path(path),
        None => Ok(config::discover_config(Path::new("."))?.unwrap_or_default()),
    }
}
