use crate::shared::error::TraceError;
use crate::shared::Result;
use serde::Serialize;

/// Source language of the repository being searched, used to pick the
/// file-extension filter for code search. JVM languages only, since the
/// supported manifests are Maven and Gradle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Java,
    Kotlin,
    Scala,
    Groovy,
}

impl Language {
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Kotlin => "kt",
            Language::Scala => "scala",
            Language::Groovy => "groovy",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "java" => Ok(Language::Java),
            "kotlin" | "kt" => Ok(Language::Kotlin),
            "scala" => Ok(Language::Scala),
            "groovy" => Ok(Language::Groovy),
            _ => Err(format!(
                "Unknown language: {}. Supported: java, kotlin, scala, groovy",
                s
            )),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::Java => write!(f, "java"),
            Language::Kotlin => write!(f, "kotlin"),
            Language::Scala => write!(f, "scala"),
            Language::Groovy => write!(f, "groovy"),
        }
    }
}

/// Kind of symbol whose implementation is being traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Method,
    Class,
    Field,
}

/// A named method, class, or field to locate inside a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolReference {
    qualified_name: String,
    kind: SymbolKind,
}

impl SymbolReference {
    pub fn new(qualified_name: String, kind: SymbolKind) -> Result<Self> {
        Self::validate(&qualified_name)?;
        Ok(Self {
            qualified_name,
            kind,
        })
    }

    /// Parses a reference and infers its kind from shape: a qualified name
    /// whose last segment starts lowercase is a method (`StringUtils.isBlank`),
    /// anything else is a class. Fields must be constructed explicitly.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        Self::validate(trimmed)?;

        let last = trimmed
            .rsplit('.')
            .next()
            .expect("validated reference has at least one segment");

        let kind = if trimmed.contains('.') && last.starts_with(|c: char| c.is_lowercase()) {
            SymbolKind::Method
        } else {
            SymbolKind::Class
        };

        Ok(Self {
            qualified_name: trimmed.to_string(),
            kind,
        })
    }

    fn validate(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(TraceError::InvalidSymbol {
                input: name.to_string(),
                reason: "symbol name cannot be empty".to_string(),
            }
            .into());
        }

        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '_' || c == '$')
        {
            return Err(TraceError::InvalidSymbol {
                input: name.to_string(),
                reason: "only alphanumeric, dots, underscores, and '$' are allowed".to_string(),
            }
            .into());
        }

        if name.split('.').any(|segment| segment.is_empty()) {
            return Err(TraceError::InvalidSymbol {
                input: name.to_string(),
                reason: "empty segment in qualified name".to_string(),
            }
            .into());
        }

        Ok(())
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    /// Last segment of the qualified name.
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .expect("validated reference has at least one segment")
    }

    /// The enclosing type hint, when the reference is qualified by one:
    /// the second-to-last segment if it looks like a type name.
    pub fn enclosing_type(&self) -> Option<&str> {
        let mut segments = self.qualified_name.rsplit('.');
        segments.next();
        segments
            .next()
            .filter(|s| s.starts_with(|c: char| c.is_uppercase()))
    }
}

impl std::fmt::Display for SymbolReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified_name)
    }
}
