//! Configuration file support for deptrace.
//!
//! Provides YAML-based configuration through `deptrace.config.yml` files,
//! including data structures, file loading, and validation. The loaded
//! table of repository mappings is passed into the resolver at
//! construction, so per-environment overrides never touch global state.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::dependency_trace::domain::{MappingRule, RepoId};
use crate::shared::Result;

const CONFIG_FILENAME: &str = "deptrace.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub github_token: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    pub max_concurrent_requests: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub max_depth: Option<usize>,
    pub top_n: Option<usize>,
    pub repository_mappings: Option<Vec<MappingEntry>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// One configured coordinate-to-repository mapping.
#[derive(Debug, Deserialize)]
pub struct MappingEntry {
    pub group: String,
    pub artifact: Option<String>,
    pub repository: String,
    #[serde(default)]
    pub prefix: bool,
}

/// Engine settings resolved from config plus defaults.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub cache_ttl: Duration,
    pub max_concurrent_requests: usize,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub max_depth: usize,
    pub top_n: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(600),
            max_concurrent_requests: 8,
            request_timeout: Duration::from_secs(10),
            max_retries: 3,
            max_depth: 3,
            top_n: 5,
        }
    }
}

impl ConfigFile {
    pub fn settings(&self) -> EngineSettings {
        let defaults = EngineSettings::default();
        EngineSettings {
            cache_ttl: self
                .cache_ttl_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            max_concurrent_requests: self
                .max_concurrent_requests
                .unwrap_or(defaults.max_concurrent_requests),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            top_n: self.top_n.unwrap_or(defaults.top_n),
        }
    }

    /// Converts configured mapping entries into resolver rules. Configured
    /// rules take precedence by coming before the built-in table.
    pub fn mapping_rules(&self) -> Result<Vec<MappingRule>> {
        let Some(entries) = &self.repository_mappings else {
            return Ok(Vec::new());
        };

        entries
            .iter()
            .map(|entry| {
                Ok(MappingRule {
                    group: entry.group.clone(),
                    artifact: entry.artifact.clone(),
                    prefix: entry.prefix,
                    repository: RepoId::parse(&entry.repository)?,
                })
            })
            .collect()
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(entries) = &config.repository_mappings {
        for (i, entry) in entries.iter().enumerate() {
            if entry.group.trim().is_empty() {
                bail!(
                    "Invalid config: repository_mappings[{}].group must not be empty.\n\n\
                     💡 Hint: Each mapping needs a group such as \"org.apache.commons\".",
                    i
                );
            }
            if !entry.repository.contains('/') {
                bail!(
                    "Invalid config: repository_mappings[{}].repository must be 'owner/repo', got '{}'.",
                    i,
                    entry.repository
                );
            }
        }
    }

    if config.max_concurrent_requests == Some(0) {
        bail!("Invalid config: max_concurrent_requests must be at least 1.");
    }

    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
