//! Search outcome and termination reasons.
//!
//! Every engine run that passes pre-flight validation produces a
//! [`SearchOutcome`], whatever stopped it.

use std::time::Duration;

use sweeproute_kernel::instance::target::{route_digest, TargetId};
use sweeproute_kernel::motion::evaluate::Evaluation;

/// Why an engine run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminationReason {
    /// `max_iterations` iterations completed.
    IterationBudgetReached,
    /// The wall-clock deadline passed at an iteration boundary.
    DeadlineReached,
    /// The cancellation flag was raised by the caller.
    Cancelled,
    /// The instance has no targets; no iteration ran.
    EmptyInstance,
    /// Selection found no child on a fully expanded, non-terminal node.
    TreeInvariantViolation,
}

impl TerminationReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IterationBudgetReached => "iteration_budget_reached",
            Self::DeadlineReached => "deadline_reached",
            Self::Cancelled => "cancelled",
            Self::EmptyInstance => "empty_instance",
            Self::TreeInvariantViolation => "tree_invariant_violation",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one engine run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best full permutation sampled during the run.
    pub best_path: Vec<TargetId>,
    /// Fitness of `best_path`.
    pub best_score: f64,
    /// Full evaluation of `best_path`.
    pub evaluation: Evaluation,
    /// Completed iterations.
    pub iterations: u64,
    pub termination: TerminationReason,
    /// Nodes in the tree when the run stopped.
    pub tree_size: usize,
    /// Seed of the engine's random stream.
    pub seed: u64,
    pub elapsed: Duration,
}

impl SearchOutcome {
    /// Serialize to a `serde_json::Value` (keys sorted by `serde_json`'s map).
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "best_path": self.best_path,
            "best_score": self.best_score,
            "elapsed_ms": u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX),
            "evaluation": evaluation_to_json(&self.evaluation),
            "iterations": self.iterations,
            "route_digest": route_digest(&self.best_path).as_str(),
            "seed": self.seed,
            "termination_reason": self.termination.as_str(),
            "tree_size": self.tree_size,
        })
    }
}

/// JSON view of an [`Evaluation`].
#[must_use]
pub fn evaluation_to_json(e: &Evaluation) -> serde_json::Value {
    serde_json::json!({
        "collected": e.collected,
        "fitness": e.fitness,
        "halted_by_budget": e.halted_by_budget,
        "resource_used": e.resource_used,
        "reward": e.reward,
        "steps_executed": e.steps_executed,
        "time_used": e.time_used,
    })
}
