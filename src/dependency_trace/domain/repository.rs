use crate::shared::error::TraceError;
use crate::shared::Result;
use serde::{Serialize, Serializer};

/// Identity of an upstream source repository (owner/name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    pub fn new(owner: String, name: String) -> Result<Self> {
        if owner.is_empty() || name.is_empty() {
            anyhow::bail!("Repository owner and name cannot be empty");
        }

        for part in [&owner, &name] {
            if !part
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
            {
                anyhow::bail!(
                    "Repository identity contains invalid characters: {}/{}",
                    owner,
                    name
                );
            }
        }

        Ok(Self { owner, name })
    }

    /// Parses `owner/repo` or a full `https://github.com/owner/repo` URL.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim().trim_end_matches('/');

        let path = if let Some(rest) = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
        {
            rest
        } else if trimmed.starts_with("http") {
            return Err(TraceError::InvalidRepository {
                input: input.to_string(),
                reason: "only github.com URLs are supported".to_string(),
            }
            .into());
        } else {
            trimmed
        };

        let mut parts = path.split('/');
        match (parts.next(), parts.next()) {
            (Some(owner), Some(name)) if !owner.is_empty() && !name.is_empty() => {
                Self::new(owner.to_string(), name.trim_end_matches(".git").to_string())
            }
            _ => Err(TraceError::InvalidRepository {
                input: input.to_string(),
                reason: "expected an 'owner/repo' pair".to_string(),
            }
            .into()),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Case-normalized key for visited-set and cache membership.
    pub fn visit_key(&self) -> String {
        self.full_name().to_lowercase()
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl Serialize for RepoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.full_name())
    }
}

/// How a coordinate was mapped to its repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingOrigin {
    /// Matched a rule in the configured mapping table
    Table,
    /// Derived heuristically and verified against the source host
    Derived,
}

/// The association between a coordinate and an upstream source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryMapping {
    pub repository: RepoId,
    pub origin: MappingOrigin,
}

/// A single coordinate-matching rule in the mapping table.
///
/// Many rules may point at one repository. A rule matches when its group
/// equals the coordinate's group (or is a prefix of it, for prefix rules)
/// and its artifact, when present, equals the coordinate's artifact.
#[derive(Debug, Clone)]
pub struct MappingRule {
    pub group: String,
    pub artifact: Option<String>,
    pub prefix: bool,
    pub repository: RepoId,
}

impl MappingRule {
    pub fn matches(&self, group: &str, artifact: &str) -> bool {
        let group_ok = if self.prefix {
            group.starts_with(self.group.as_str())
        } else {
            group == self.group
        };

        let artifact_ok = match &self.artifact {
            Some(a) => a == artifact,
            None => true,
        };

        group_ok && artifact_ok
    }
}

/// Outcome of resolving one coordinate. `Unmapped` is a normal, reportable
/// result, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "mapping", rename_all = "snake_case")]
pub enum Resolution {
    Mapped(RepositoryMapping),
    Unmapped,
}

impl Resolution {
    pub fn is_mapped(&self) -> bool {
        matches!(self, Resolution::Mapped(_))
    }

    pub fn repository(&self) -> Option<&RepoId> {
        match self {
            Resolution::Mapped(mapping) => Some(&mapping.repository),
            Resolution::Unmapped => None,
        }
    }
}
