use crate::dependency_trace::domain::DependencyCoordinate;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Supported build-manifest dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestDialect {
    Maven,
    Gradle,
}

impl std::str::FromStr for ManifestDialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "maven" | "pom" | "xml" => Ok(ManifestDialect::Maven),
            "gradle" => Ok(ManifestDialect::Gradle),
            _ => Err(format!(
                "Invalid dialect: {}. Please specify 'maven' or 'gradle'",
                s
            )),
        }
    }
}

impl std::fmt::Display for ManifestDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestDialect::Maven => write!(f, "maven"),
            ManifestDialect::Gradle => write!(f, "gradle"),
        }
    }
}

/// A localized parse problem. Non-fatal: parsing continues past it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestIssue {
    pub dialect: ManifestDialect,
    pub line: usize,
    pub details: String,
}

/// Result of scanning one manifest: the declared coordinates in declaration
/// order, plus whatever could not be parsed. Never all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct ManifestScan {
    pub coordinates: Vec<DependencyCoordinate>,
    pub issues: Vec<ManifestIssue>,
}

impl ManifestScan {
    fn issue(&mut self, dialect: ManifestDialect, line: usize, details: impl Into<String>) {
        self.issues.push(ManifestIssue {
            dialect,
            line,
            details: details.into(),
        });
    }
}

/// Extracts declared dependency coordinates from Maven POMs and Gradle build
/// scripts. Parsing is line/regex based; property and variable references are
/// substituted best-effort, and anything unresolved surfaces as a coordinate
/// with a placeholder version.
pub struct ManifestParser;

impl ManifestParser {
    pub fn parse(text: &str, dialect: ManifestDialect) -> ManifestScan {
        match dialect {
            ManifestDialect::Maven => Self::parse_maven(text),
            ManifestDialect::Gradle => Self::parse_gradle(text),
        }
    }

    // ---- Maven ----

    fn parse_maven(text: &str) -> ManifestScan {
        let mut scan = ManifestScan::default();

        let blanked = blank_xml_comments(text);

        if !blanked.contains("<project") && !blanked.contains("<dependencies") {
            scan.issue(
                ManifestDialect::Maven,
                1,
                "input does not look like a Maven POM (no <project> or <dependencies> element)",
            );
            return scan;
        }

        let properties = maven_properties(&blanked);

        for block in dependency_block_re().captures_iter(&blanked) {
            let whole = block.get(0).expect("capture 0 always present");
            let line = line_of_offset(&blanked, whole.start());

            // Nested <exclusions> carry their own groupId/artifactId pairs.
            let body = block
                .get(1)
                .map(|m| m.as_str())
                .unwrap_or_default();
            let body = body
                .split("<exclusions>")
                .next()
                .unwrap_or(body);

            let group = extract_tag(body, "groupId");
            let artifact = extract_tag(body, "artifactId");

            let (Some(group), Some(artifact)) = (group, artifact) else {
                scan.issue(
                    ManifestDialect::Maven,
                    line,
                    "dependency declaration is missing groupId or artifactId",
                );
                continue;
            };

            let group = substitute_properties(&group, &properties);
            let artifact = substitute_properties(&artifact, &properties);

            let coordinate = match extract_tag(body, "version") {
                Some(raw) => {
                    let substituted = substitute_properties(&raw, &properties);
                    if substituted.contains("${") {
                        DependencyCoordinate::with_placeholder_version(group, artifact)
                    } else {
                        DependencyCoordinate::new(group, artifact, substituted)
                    }
                }
                // BOM-managed dependency: no version element at all
                None => DependencyCoordinate::with_placeholder_version(group, artifact),
            };

            match coordinate {
                Ok(coordinate) => scan.coordinates.push(coordinate),
                Err(e) => scan.issue(ManifestDialect::Maven, line, e.to_string()),
            }
        }

        if scan.coordinates.is_empty() && scan.issues.is_empty() && !blanked.contains("<dependency>")
        {
            scan.issue(
                ManifestDialect::Maven,
                1,
                "no dependency declarations found",
            );
        }

        scan
    }

    // ---- Gradle ----

    fn parse_gradle(text: &str) -> ManifestScan {
        let mut scan = ManifestScan::default();
        let variables = gradle_variables(text);

        let mut matched_any = false;
        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let Some(captures) = gradle_dependency_re().captures(raw_line) else {
                continue;
            };
            matched_any = true;

            let notation = captures
                .get(2)
                .expect("dependency pattern always captures the notation")
                .as_str();
            let notation = substitute_gradle_variables(notation, &variables);

            let parts: Vec<&str> = notation.split(':').collect();
            let coordinate = match parts.as_slice() {
                [group, artifact] => DependencyCoordinate::with_placeholder_version(
                    group.to_string(),
                    artifact.to_string(),
                ),
                // classifier segments past the version are dropped
                [group, artifact, version, ..] => {
                    if version.contains('$') {
                        DependencyCoordinate::with_placeholder_version(
                            group.to_string(),
                            artifact.to_string(),
                        )
                    } else {
                        DependencyCoordinate::new(
                            group.to_string(),
                            artifact.to_string(),
                            version.to_string(),
                        )
                    }
                }
                _ => {
                    scan.issue(
                        ManifestDialect::Gradle,
                        line_number,
                        format!("dependency notation '{}' is not group:artifact[:version]", notation),
                    );
                    continue;
                }
            };

            match coordinate {
                Ok(coordinate) => scan.coordinates.push(coordinate),
                Err(e) => scan.issue(ManifestDialect::Gradle, line_number, e.to_string()),
            }
        }

        if !matched_any && !text.contains("dependencies") {
            scan.issue(
                ManifestDialect::Gradle,
                1,
                "no dependency declarations found in Gradle script",
            );
        }

        scan
    }
}

// ---- Maven helpers ----

fn dependency_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<dependency>(.*?)</dependency>").expect("static pattern compiles")
    })
}

/// Blanks `<!-- ... -->` ranges while preserving offsets and newlines, so
/// reported line numbers stay aligned with the original text.
fn blank_xml_comments(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("static pattern compiles"));

    let mut out = text.to_string();
    for m in re.find_iter(text) {
        // Same byte length as the original range so offsets stay stable.
        let mut blanked = String::with_capacity(m.len());
        for c in text[m.range()].chars() {
            if c == '\n' {
                blanked.push('\n');
            } else {
                for _ in 0..c.len_utf8() {
                    blanked.push(' ');
                }
            }
        }
        out.replace_range(m.range(), &blanked);
    }
    out
}

fn extract_tag(body: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = body.find(&open)? + open.len();
    let end = body[start..].find(&close)? + start;
    let value = body[start..end].trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Collects `<properties>` entries plus a best-effort `project.version`
/// (the first top-level `<version>` before any dependency block).
fn maven_properties(text: &str) -> HashMap<String, String> {
    static PROPS_RE: OnceLock<Regex> = OnceLock::new();
    static ENTRY_RE: OnceLock<Regex> = OnceLock::new();

    let props_re = PROPS_RE.get_or_init(|| {
        Regex::new(r"(?s)<properties>(.*?)</properties>").expect("static pattern compiles")
    });
    let entry_re = ENTRY_RE.get_or_init(|| {
        Regex::new(r"<([A-Za-z][\w.\-]*)>([^<]*)</([A-Za-z][\w.\-]*)>")
            .expect("static pattern compiles")
    });

    let mut properties = HashMap::new();

    for section in props_re.captures_iter(text) {
        let body = section.get(1).map(|m| m.as_str()).unwrap_or_default();
        for entry in entry_re.captures_iter(body) {
            let (name, value, closing) = (&entry[1], entry[2].trim(), &entry[3]);
            if name == closing && !value.is_empty() {
                properties.insert(name.to_string(), value.to_string());
            }
        }
    }

    let deps_at = text.find("<dependency>").unwrap_or(text.len());
    if let Some(version) = extract_tag(&text[..deps_at], "version") {
        properties
            .entry("project.version".to_string())
            .or_insert(version);
    }

    properties
}

fn substitute_properties(value: &str, properties: &HashMap<String, String>) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\$\{([\w.\-]+)\}").expect("static pattern compiles"));

    re.replace_all(value, |captures: &regex::Captures<'_>| {
        match properties.get(&captures[1]) {
            Some(resolved) => resolved.clone(),
            None => captures[0].to_string(),
        }
    })
    .into_owned()
}

fn line_of_offset(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|b| *b == b'\n').count() + 1
}

// ---- Gradle helpers ----

fn gradle_dependency_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^\s*(implementation|api|compile|compileOnly|runtimeOnly|testImplementation|testCompile|annotationProcessor)\s*[\s(]\s*['"]([^'"]+)['"]"#,
        )
        .expect("static pattern compiles")
    })
}

fn gradle_variables(text: &str) -> HashMap<String, String> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = RES.get_or_init(|| {
        vec![
            Regex::new(r#"(?m)^\s*def\s+(\w+)\s*=\s*['"]([^'"]+)['"]"#)
                .expect("static pattern compiles"),
            Regex::new(r#"(?m)ext\.(\w+)\s*=\s*['"]([^'"]+)['"]"#)
                .expect("static pattern compiles"),
            Regex::new(r#"(?m)set\(\s*['"](\w+)['"]\s*,\s*['"]([^'"]+)['"]\s*\)"#)
                .expect("static pattern compiles"),
        ]
    });

    let mut variables = HashMap::new();
    for pattern in patterns {
        for captures in pattern.captures_iter(text) {
            variables.insert(captures[1].to_string(), captures[2].to_string());
        }
    }
    variables
}

fn substitute_gradle_variables(notation: &str, variables: &HashMap<String, String>) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"\$\{?(\w+)\}?").expect("static pattern compiles")
    });

    re.replace_all(notation, |captures: &regex::Captures<'_>| {
        match variables.get(&captures[1]) {
            Some(resolved) => resolved.clone(),
            None => captures[0].to_string(),
        }
    })
    .into_owned()
}
