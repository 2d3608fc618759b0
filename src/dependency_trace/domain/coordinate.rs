use crate::shared::Result;
use serde::Serialize;

/// Maximum length for group and artifact identifiers (security limit)
const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Maximum length for version strings (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Version placeholder used when a manifest declares a dependency without a
/// resolvable version (BOM-managed entries, unresolved property references).
pub const PLACEHOLDER_VERSION: &str = "unresolved";

/// A declared dependency: the (group, artifact, version) triple from a build
/// manifest. Immutable once parsed.
///
/// `version_resolved` is false when the version is the placeholder, so that
/// downstream stages can skip version-specific behavior gracefully.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DependencyCoordinate {
    group: String,
    artifact: String,
    version: String,
    version_resolved: bool,
}

impl DependencyCoordinate {
    pub fn new(group: String, artifact: String, version: String) -> Result<Self> {
        validate_identifier(&group, "Group identifier")?;
        validate_identifier(&artifact, "Artifact identifier")?;
        validate_version(&version)?;

        Ok(Self {
            group,
            artifact,
            version,
            version_resolved: true,
        })
    }

    /// Builds a coordinate whose version could not be determined.
    pub fn with_placeholder_version(group: String, artifact: String) -> Result<Self> {
        validate_identifier(&group, "Group identifier")?;
        validate_identifier(&artifact, "Artifact identifier")?;

        Ok(Self {
            group,
            artifact,
            version: PLACEHOLDER_VERSION.to_string(),
            version_resolved: false,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn version_resolved(&self) -> bool {
        self.version_resolved
    }

    /// Normalized cache key for repository mapping. The version is excluded
    /// because repository identity rarely depends on it.
    pub fn mapping_key(&self) -> String {
        format!(
            "{}:{}",
            self.group.to_lowercase(),
            self.artifact.to_lowercase()
        )
    }
}

impl std::fmt::Display for DependencyCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)
    }
}

fn validate_identifier(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", what);
    }

    if value.len() > MAX_IDENTIFIER_LENGTH {
        anyhow::bail!(
            "{} is too long ({} bytes). Maximum allowed: {} bytes",
            what,
            value.len(),
            MAX_IDENTIFIER_LENGTH
        );
    }

    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        anyhow::bail!(
            "{} contains invalid characters. Only alphanumeric, dots, hyphens, and underscores are allowed.",
            what
        );
    }

    Ok(())
}

fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        anyhow::bail!("Version cannot be empty");
    }

    if version.len() > MAX_VERSION_LENGTH {
        anyhow::bail!(
            "Version is too long ({} bytes). Maximum allowed: {} bytes",
            version.len(),
            MAX_VERSION_LENGTH
        );
    }

    if !version
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_' || c == '+')
    {
        anyhow::bail!(
            "Version contains invalid characters. Only alphanumeric, dots, hyphens, underscores, and plus are allowed."
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_new_valid() {
        let coord = DependencyCoordinate::new(
            "org.apache.commons".to_string(),
            "commons-lang3".to_string(),
            "3.12.0".to_string(),
        )
        .unwrap();
        assert_eq!(coord.group(), "org.apache.commons");
        assert_eq!(coord.artifact(), "commons-lang3");
        assert_eq!(coord.version(), "3.12.0");
        assert!(coord.version_resolved());
    }

    #[test]
    fn test_coordinate_empty_group() {
        let result = DependencyCoordinate::new(
            "".to_string(),
            "commons-lang3".to_string(),
            "3.12.0".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_coordinate_invalid_characters() {
        let result = DependencyCoordinate::new(
            "org/apache".to_string(),
            "commons-lang3".to_string(),
            "3.12.0".to_string(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_placeholder_version() {
        let coord = DependencyCoordinate::with_placeholder_version(
            "org.example".to_string(),
            "managed-lib".to_string(),
        )
        .unwrap();
        assert_eq!(coord.version(), PLACEHOLDER_VERSION);
        assert!(!coord.version_resolved());
    }

    #[test]
    fn test_mapping_key_ignores_version_and_case() {
        let a = DependencyCoordinate::new(
            "Org.Apache.Commons".to_string(),
            "Commons-Lang3".to_string(),
            "3.12.0".to_string(),
        )
        .unwrap();
        let b = DependencyCoordinate::new(
            "org.apache.commons".to_string(),
            "commons-lang3".to_string(),
            "3.11.0".to_string(),
        )
        .unwrap();
        assert_eq!(a.mapping_key(), b.mapping_key());
    }

    #[test]
    fn test_coordinate_display() {
        let coord = DependencyCoordinate::new(
            "cn.hutool".to_string(),
            "hutool-all".to_string(),
            "5.8.11".to_string(),
        )
        .unwrap();
        assert_eq!(format!("{}", coord), "cn.hutool:hutool-all:5.8.11");
    }
}
