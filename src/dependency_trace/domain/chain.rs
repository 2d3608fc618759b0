use super::{DependencyCoordinate, RepoId, SourceLocation};
use serde::Serialize;

/// Why a chain node stopped expanding (or that it didn't).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeState {
    /// Fully expanded; children reflect the repository's declared dependencies
    Expanded,
    /// Repository already visited on this traversal; not re-expanded
    Cyclic,
    /// Maximum depth reached before expansion
    DepthCapped,
    /// Coordinate could not be mapped to an upstream repository
    Unmapped,
    /// Deadline expired before this node could be expanded
    Truncated,
    /// Expansion failed (e.g. manifest discovery error after retries)
    Failed { reason: String },
}

/// One node in the recursively expanded dependency graph.
///
/// Nominally a tree, but declared dependencies can reference back to an
/// ancestor; such nodes are marked `Cyclic` and kept, not eliminated.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyChainNode {
    pub coordinate: DependencyCoordinate,
    pub repository: Option<RepoId>,
    pub location: Option<SourceLocation>,
    pub state: NodeState,
    pub children: Vec<DependencyChainNode>,
}

impl DependencyChainNode {
    pub fn leaf(
        coordinate: DependencyCoordinate,
        repository: Option<RepoId>,
        state: NodeState,
    ) -> Self {
        Self {
            coordinate,
            repository,
            location: None,
            state,
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DependencyChainNode::node_count)
            .sum::<usize>()
    }

    /// Depth of the deepest node, with the root at depth 0.
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.state, NodeState::Expanded)
    }
}
