//! Arena-backed MCTS tree over visiting-order prefixes.
//!
//! Nodes live in one `Vec` and refer to each other by index: a parent index
//! for backpropagation and prefix reconstruction, and an ordered list of child
//! indices for selection. Semantically this is a map from prefix to node;
//! [`SearchTree::find`] and [`SearchTree::prefix`] translate between the two.

use rand::Rng;

use sweeproute_kernel::instance::collected::CollectedSet;
use sweeproute_kernel::instance::target::TargetId;

use crate::node::{NodeId, TreeNode};
use crate::scorer::{ucb1, ScoreBounds};

/// Root node index.
pub const ROOT: NodeId = 0;

/// The search tree of one engine run.
#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<TreeNode>,
    target_count: usize,
}

impl SearchTree {
    /// A tree holding only the root (empty prefix, every id untried).
    #[must_use]
    pub fn new(target_count: usize) -> Self {
        let untried = (0..target_count)
            .filter_map(|i| TargetId::try_from(i).ok())
            .collect();
        Self {
            nodes: vec![TreeNode::new(None, None, 0, untried)],
            target_count,
        }
    }

    /// Number of nodes created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_count
    }

    /// Access a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    /// All nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &TreeNode)> {
        self.nodes.iter().enumerate()
    }

    /// A node whose prefix covers every target. Terminal nodes have no children.
    #[must_use]
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.nodes[id].depth >= self.target_count
    }

    /// Untried set empty and not terminal: selection descends through it.
    #[must_use]
    pub fn is_fully_expanded(&self, id: NodeId) -> bool {
        self.nodes[id].untried.is_empty() && !self.is_terminal(id)
    }

    /// Expand `id` by one uniformly chosen untried action.
    ///
    /// The action is removed from the parent's untried set and the new child
    /// starts with every id not in its own prefix as untried. Returns `None`
    /// when `id` is terminal or has nothing left to try.
    pub fn expand<R>(&mut self, id: NodeId, rng: &mut R) -> Option<NodeId>
    where
        R: Rng + ?Sized,
    {
        if self.is_terminal(id) || self.nodes[id].untried.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..self.nodes[id].untried.len());
        let action = self.nodes[id].untried.swap_remove(pick);

        let mut prefix = self.prefix(id);
        prefix.push(action);
        let mut in_prefix = CollectedSet::with_capacity(self.target_count);
        for &p in &prefix {
            in_prefix.insert(p);
        }
        let untried = (0..self.target_count)
            .filter_map(|i| TargetId::try_from(i).ok())
            .filter(|&t| !in_prefix.contains(t))
            .collect();

        let child_id = self.nodes.len();
        let depth = self.nodes[id].depth + 1;
        self.nodes
            .push(TreeNode::new(Some(id), Some(action), depth, untried));

        let slot = self.nodes[id]
            .children
            .partition_point(|&c| self.nodes[c].action < Some(action));
        self.nodes[id].children.insert(slot, child_id);
        Some(child_id)
    }

    /// Pick the child of `id` with the highest UCB1 score.
    ///
    /// An unvisited child is returned immediately. Ties keep the child with
    /// the lowest action id. Returns `None` only if `id` has no children.
    #[must_use]
    pub fn select_child(&self, id: NodeId, bounds: &ScoreBounds, exploration: f64) -> Option<NodeId> {
        let parent_visits = self.nodes[id].visit_count;
        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &self.nodes[id].children {
            let child = &self.nodes[child_id];
            let Some(average) = child.average_score() else {
                return Some(child_id);
            };
            let score = ucb1(
                bounds.normalize(average),
                parent_visits,
                child.visit_count,
                exploration,
            );
            let better = match best {
                Some((_, best_score)) => score > best_score,
                None => true,
            };
            if better {
                best = Some((child_id, score));
            }
        }
        best.map(|(child_id, _)| child_id)
    }

    /// Credit `score` to `id` and every ancestor up to and including the root.
    pub fn backpropagate(&mut self, id: NodeId, score: f64) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id];
            node.visit_count += 1;
            node.cumulative_score += score;
            current = node.parent;
        }
    }

    /// Reconstruct the visiting-order prefix of `id` from the parent chain.
    #[must_use]
    pub fn prefix(&self, id: NodeId) -> Vec<TargetId> {
        let mut path = Vec::with_capacity(self.nodes[id].depth);
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            if let Some(action) = node.action {
                path.push(action);
            }
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Resolve a prefix to its node, if that prefix has been expanded.
    #[must_use]
    pub fn find(&self, prefix: &[TargetId]) -> Option<NodeId> {
        let mut current = ROOT;
        for &action in prefix {
            let children = &self.nodes[current].children;
            let slot = children
                .binary_search_by(|&c| self.nodes[c].action.cmp(&Some(action)))
                .ok()?;
            current = children[slot];
        }
        Some(current)
    }
}
