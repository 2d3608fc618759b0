use crate::dependency_trace::domain::{
    DependencyChainNode, DependencyCoordinate, NodeState, RepoId, Resolution, SymbolReference,
};
use crate::dependency_trace::services::coordinate_resolver::CoordinateResolver;
use crate::dependency_trace::services::manifest_parser::{
    ManifestDialect, ManifestParser, ManifestScan,
};
use crate::dependency_trace::services::symbol_locator::{LocateOptions, SymbolLocator};
use crate::ports::outbound::SourceHost;
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Build files recognized in a repository root, with their dialects.
const BUILD_FILES: &[(&str, ManifestDialect)] = &[
    ("pom.xml", ManifestDialect::Maven),
    ("build.gradle", ManifestDialect::Gradle),
    ("build.gradle.kts", ManifestDialect::Gradle),
];

/// Options for one chain build.
#[derive(Debug, Clone)]
pub struct ChainOptions {
    pub max_depth: usize,
    /// Wall-clock budget; expansion past it returns the partial graph
    pub deadline: Option<Duration>,
    pub locate: LocateOptions,
}

impl Default for ChainOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            deadline: None,
            locate: LocateOptions::default(),
        }
    }
}

/// A coordinate (or repository) the build could not fully handle, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedEntry {
    pub subject: String,
    pub reason: String,
}

/// Result of one chain build: the graph plus everything that could not be
/// resolved along the way.
#[derive(Debug, Clone, Serialize)]
pub struct ChainOutcome {
    pub root: DependencyChainNode,
    pub deadline_exceeded: bool,
    pub unresolved: Vec<UnresolvedEntry>,
}

/// Recursively expands a symbol's dependency chain across repositories.
///
/// The graph shape is deterministic: children appear in manifest
/// declaration order, subtrees expand in that order, and a repository
/// visited earlier in the traversal is marked cyclic instead of being
/// expanded again. Remote work still overlaps inside each node (coordinate
/// resolutions and window fetches run concurrently under the host's global
/// in-flight cap). All failures stay local to the node that hit them.
pub struct ChainBuilder<H: SourceHost> {
    host: Arc<H>,
    resolver: Arc<CoordinateResolver<H>>,
    locator: Arc<SymbolLocator<H>>,
}

/// Shared traversal state. Only the visited set is contended; everything
/// else per node is local.
struct Traversal {
    visited: Mutex<HashSet<String>>,
    deadline: Option<Instant>,
    deadline_hit: AtomicBool,
    unresolved: Mutex<Vec<UnresolvedEntry>>,
    locate: LocateOptions,
    max_depth: usize,
}

impl Traversal {
    fn expired(&self) -> bool {
        match self.deadline {
            Some(deadline) => {
                if Instant::now() >= deadline {
                    self.deadline_hit.store(true, Ordering::Relaxed);
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Returns false when the repository was already visited on this
    /// traversal.
    fn mark_visited(&self, repository: &RepoId) -> bool {
        self.visited
            .lock()
            .expect("visited-set lock is never poisoned")
            .insert(repository.visit_key())
    }

    fn note(&self, subject: impl Into<String>, reason: impl Into<String>) {
        self.unresolved
            .lock()
            .expect("unresolved-list lock is never poisoned")
            .push(UnresolvedEntry {
                subject: subject.into(),
                reason: reason.into(),
            });
    }
}

impl<H: SourceHost> ChainBuilder<H> {
    pub fn new(
        host: Arc<H>,
        resolver: Arc<CoordinateResolver<H>>,
        locator: Arc<SymbolLocator<H>>,
    ) -> Self {
        Self {
            host,
            resolver,
            locator,
        }
    }

    pub async fn build_chain(
        &self,
        root: RepoId,
        symbol: SymbolReference,
        options: ChainOptions,
    ) -> ChainOutcome {
        let traversal = Traversal {
            visited: Mutex::new(HashSet::new()),
            deadline: options.deadline.map(|d| Instant::now() + d),
            deadline_hit: AtomicBool::new(false),
            unresolved: Mutex::new(Vec::new()),
            locate: options.locate,
            max_depth: options.max_depth,
        };

        let coordinate = synthetic_coordinate(&root);
        traversal.mark_visited(&root);
        let node = self
            .expand(coordinate, root, &symbol, 0, &traversal)
            .await;

        ChainOutcome {
            root: node,
            deadline_exceeded: traversal.deadline_hit.load(Ordering::Relaxed),
            unresolved: traversal
                .unresolved
                .into_inner()
                .expect("unresolved-list lock is never poisoned"),
        }
    }

    /// Expands one resolved node. The caller has already inserted the
    /// repository into the visited set.
    fn expand<'a>(
        &'a self,
        coordinate: DependencyCoordinate,
        repository: RepoId,
        symbol: &'a SymbolReference,
        depth: usize,
        traversal: &'a Traversal,
    ) -> BoxFuture<'a, DependencyChainNode> {
        async move {
            if traversal.expired() {
                return DependencyChainNode::leaf(
                    coordinate,
                    Some(repository),
                    NodeState::Truncated,
                );
            }

            if depth >= traversal.max_depth {
                return DependencyChainNode::leaf(
                    coordinate,
                    Some(repository),
                    NodeState::DepthCapped,
                );
            }

            let location = match self
                .locator
                .locate(&repository, symbol, &traversal.locate)
                .await
            {
                Ok(mut locations) => {
                    if locations.is_empty() {
                        None
                    } else {
                        Some(locations.remove(0))
                    }
                }
                Err(e) => {
                    traversal.note(
                        format!("{} in {}", symbol, repository),
                        format!("symbol search failed: {}", e),
                    );
                    None
                }
            };

            let scan = match self.read_manifests(&repository).await {
                Ok(scan) => scan,
                Err(e) => {
                    let reason = format!("manifest discovery failed: {}", e);
                    traversal.note(repository.full_name(), reason.clone());
                    return DependencyChainNode {
                        coordinate,
                        repository: Some(repository),
                        location,
                        state: NodeState::Failed { reason },
                        children: Vec::new(),
                    };
                }
            };

            for issue in &scan.issues {
                traversal.note(
                    format!("{} manifest of {}", issue.dialect, repository),
                    format!("line {}: {}", issue.line, issue.details),
                );
            }

            // Resolve every declared coordinate, preserving declaration order.
            let resolutions = futures::future::join_all(
                scan.coordinates
                    .iter()
                    .map(|coordinate| self.resolver.resolve(coordinate)),
            )
            .await;

            // Child subtrees expand in declaration order so identical inputs
            // always produce an identical graph shape; the parallelism lives
            // in coordinate resolution and window fetches instead.
            let mut children = Vec::new();
            for (child_coordinate, resolution) in scan.coordinates.into_iter().zip(resolutions) {
                match resolution {
                    Resolution::Unmapped => {
                        traversal.note(
                            child_coordinate.to_string(),
                            "no upstream repository mapping",
                        );
                        children.push(DependencyChainNode::leaf(
                            child_coordinate,
                            None,
                            NodeState::Unmapped,
                        ));
                    }
                    Resolution::Mapped(mapping) => {
                        let child_repo = mapping.repository;
                        if traversal.mark_visited(&child_repo) {
                            children.push(
                                self.expand(
                                    child_coordinate,
                                    child_repo,
                                    symbol,
                                    depth + 1,
                                    traversal,
                                )
                                .await,
                            );
                        } else {
                            children.push(DependencyChainNode::leaf(
                                child_coordinate,
                                Some(child_repo),
                                NodeState::Cyclic,
                            ));
                        }
                    }
                }
            }

            DependencyChainNode {
                coordinate,
                repository: Some(repository),
                location,
                state: NodeState::Expanded,
                children,
            }
        }
        .boxed()
    }

    /// Discovers and parses the repository's build files. Scans from
    /// multiple build files concatenate in the fixed pom/gradle order.
    async fn read_manifests(&self, repository: &RepoId) -> crate::shared::Result<ManifestScan> {
        let entries = self.host.list_directory(repository, "").await?;

        let mut combined = ManifestScan::default();
        for (file_name, dialect) in BUILD_FILES {
            let Some(entry) = entries
                .iter()
                .find(|e| !e.is_dir && e.name == *file_name)
            else {
                continue;
            };

            let content = self
                .host
                .get_file_content(repository, &entry.path, None)
                .await?;
            let scan = ManifestParser::parse(&content, *dialect);
            combined.coordinates.extend(scan.coordinates);
            combined.issues.extend(scan.issues);
        }

        Ok(combined)
    }
}

/// The root of a chain has no declared coordinate of its own; it is
/// identified by the repository, so one is synthesized from it.
fn synthetic_coordinate(repository: &RepoId) -> DependencyCoordinate {
    DependencyCoordinate::with_placeholder_version(
        repository.owner().to_string(),
        repository.name().to_string(),
    )
    .unwrap_or_else(|_| {
        DependencyCoordinate::with_placeholder_version("root".to_string(), "root".to_string())
            .expect("static fallback coordinate is well-formed")
    })
}
