use crate::cache::ResultCache;
use crate::dependency_trace::domain::{
    DependencyCoordinate, MappingOrigin, MappingRule, RepoId, RepositoryMapping, Resolution,
};
use crate::ports::outbound::SourceHost;
use std::sync::Arc;
use std::time::Duration;

/// Group segments that carry no organization information by themselves.
const TLD_SEGMENTS: &[&str] = &[
    "com", "org", "net", "io", "cn", "de", "fr", "uk", "co", "edu", "gov", "me",
];

/// Maps a dependency coordinate to a candidate upstream repository.
///
/// Resolution order, first match wins:
/// 1. the configured mapping table (exact, then group-only, then prefix rules)
/// 2. heuristic derivation from the reverse-domain group and the artifact
///    name, verified against the source host
/// 3. `Unmapped` - a normal outcome, not an error
///
/// Results are cached by normalized group:artifact for the configured TTL;
/// the version is ignored because repository identity rarely depends on it.
pub struct CoordinateResolver<H: SourceHost> {
    host: Arc<H>,
    rules: Vec<MappingRule>,
    cache: ResultCache<String, Resolution>,
}

impl<H: SourceHost> CoordinateResolver<H> {
    pub fn new(host: Arc<H>, rules: Vec<MappingRule>, cache_ttl: Duration) -> Self {
        Self {
            host,
            rules,
            cache: ResultCache::new(cache_ttl),
        }
    }

    /// The built-in table of well-known JVM libraries.
    pub fn default_rules() -> Vec<MappingRule> {
        const TABLE: &[(&str, &str)] = &[
            ("cn.hutool", "hutool/hutool"),
            ("org.springframework", "spring-projects/spring-framework"),
            ("org.apache.commons", "apache/commons-lang"),
            ("com.fasterxml.jackson", "FasterXML/jackson-core"),
            ("org.mybatis", "mybatis/mybatis-3"),
            ("com.baomidou", "baomidou/mybatis-plus"),
            ("org.slf4j", "qos-ch/slf4j"),
            ("ch.qos.logback", "qos-ch/logback"),
        ];

        TABLE
            .iter()
            .map(|(group, repo)| MappingRule {
                group: group.to_string(),
                artifact: None,
                prefix: true,
                repository: RepoId::parse(repo)
                    .expect("built-in mapping table entries are well-formed"),
            })
            .collect()
    }

    pub async fn resolve(&self, coordinate: &DependencyCoordinate) -> Resolution {
        let key = coordinate.mapping_key();

        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let resolution = self.resolve_uncached(coordinate).await;
        self.cache.put(key, resolution.clone());
        resolution
    }

    /// Forced refresh: drops the cached resolution for this coordinate.
    pub fn invalidate(&self, coordinate: &DependencyCoordinate) {
        self.cache.invalidate(&coordinate.mapping_key());
    }

    async fn resolve_uncached(&self, coordinate: &DependencyCoordinate) -> Resolution {
        if let Some(repository) = self.table_lookup(coordinate) {
            return Resolution::Mapped(RepositoryMapping {
                repository,
                origin: MappingOrigin::Table,
            });
        }

        if let Some(repository) = self.derive_and_verify(coordinate).await {
            return Resolution::Mapped(RepositoryMapping {
                repository,
                origin: MappingOrigin::Derived,
            });
        }

        Resolution::Unmapped
    }

    /// Table precedence: an exact (group, artifact) rule beats a group-only
    /// rule, which beats a prefix rule.
    fn table_lookup(&self, coordinate: &DependencyCoordinate) -> Option<RepoId> {
        let group = coordinate.group();
        let artifact = coordinate.artifact();

        let exact = self
            .rules
            .iter()
            .find(|r| !r.prefix && r.artifact.is_some() && r.matches(group, artifact));
        let group_only = || {
            self.rules
                .iter()
                .find(|r| !r.prefix && r.artifact.is_none() && r.matches(group, artifact))
        };
        let prefix = || self.rules.iter().find(|r| r.prefix && r.matches(group, artifact));

        exact
            .or_else(group_only)
            .or_else(prefix)
            .map(|rule| rule.repository.clone())
    }

    /// Derives candidate owner/name pairs and keeps the first one the host
    /// confirms. A verification failure (including a remote error) merely
    /// disqualifies that candidate.
    async fn derive_and_verify(&self, coordinate: &DependencyCoordinate) -> Option<RepoId> {
        let owners = organization_candidates(coordinate.group());
        let names = repository_candidates(coordinate.artifact());

        for owner in &owners {
            for name in &names {
                let exists = self
                    .host
                    .repository_exists(owner, name)
                    .await
                    .unwrap_or(false);
                if exists {
                    if let Ok(repo) = RepoId::new(owner.clone(), name.clone()) {
                        return Some(repo);
                    }
                }
            }
        }

        None
    }
}

/// Candidate organization names from a reverse-domain group identifier:
/// the first segment after the TLD, then the last segment.
fn organization_candidates(group: &str) -> Vec<String> {
    let segments: Vec<&str> = group.split('.').filter(|s| !s.is_empty()).collect();

    let mut candidates = Vec::new();
    let meaningful: Vec<&str> = segments
        .iter()
        .enumerate()
        .filter(|(i, s)| *i > 0 || !TLD_SEGMENTS.contains(s))
        .map(|(_, s)| *s)
        .collect();

    if let Some(first) = meaningful.first() {
        candidates.push(first.to_string());
    }
    if let Some(last) = meaningful.last() {
        if !candidates.contains(&last.to_string()) {
            candidates.push(last.to_string());
        }
    }

    candidates
}

/// Candidate repository names from an artifact identifier: verbatim, with a
/// trailing version digit stripped (commons-lang3 -> commons-lang), and the
/// leading dash segment.
fn repository_candidates(artifact: &str) -> Vec<String> {
    let mut candidates = vec![artifact.to_string()];

    let stripped = artifact.trim_end_matches(|c: char| c.is_ascii_digit());
    if stripped != artifact && !stripped.is_empty() {
        candidates.push(stripped.to_string());
    }

    if let Some(head) = artifact.split('-').next() {
        if head != artifact && !candidates.contains(&head.to_string()) {
            candidates.push(head.to_string());
        }
    }

    candidates
}
