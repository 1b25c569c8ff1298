//! Search tree node.

use sweeproute_kernel::instance::target::TargetId;

/// Index of a node in its [`crate::tree::SearchTree`] arena. The root is `0`.
pub type NodeId = usize;

/// One visiting-order prefix in the search tree.
///
/// The prefix itself is not stored: it is the chain of `action`s from the
/// root down to this node (see [`crate::tree::SearchTree::prefix`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub(crate) parent: Option<NodeId>,
    /// The id appended to the parent's prefix (`None` for the root).
    pub(crate) action: Option<TargetId>,
    /// Prefix length (root = 0).
    pub(crate) depth: usize,
    pub(crate) visit_count: u64,
    pub(crate) cumulative_score: f64,
    /// Ids not in this prefix that have not been expanded yet. Only shrinks.
    pub(crate) untried: Vec<TargetId>,
    /// Expanded children, ordered by ascending action id.
    pub(crate) children: Vec<NodeId>,
}

impl TreeNode {
    pub(crate) fn new(
        parent: Option<NodeId>,
        action: Option<TargetId>,
        depth: usize,
        untried: Vec<TargetId>,
    ) -> Self {
        Self {
            parent,
            action,
            depth,
            visit_count: 0,
            cumulative_score: 0.0,
            untried,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn action(&self) -> Option<TargetId> {
        self.action
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn visit_count(&self) -> u64 {
        self.visit_count
    }

    #[must_use]
    pub fn cumulative_score(&self) -> f64 {
        self.cumulative_score
    }

    #[must_use]
    pub fn untried(&self) -> &[TargetId] {
        &self.untried
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Mean rollout fitness, or `None` before the first visit.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_score(&self) -> Option<f64> {
        (self.visit_count > 0).then(|| self.cumulative_score / self.visit_count as f64)
    }
}
