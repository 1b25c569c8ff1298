//! Search policy types.

use crate::error::SearchError;

/// Default iteration budget per engine run.
pub const DEFAULT_MAX_ITERATIONS: u64 = 100_000;

/// Default UCB1 exploration constant (≈ √2).
pub const DEFAULT_EXPLORATION_CONSTANT: f64 = 1.414;

/// Budget and selection configuration for one MCTS engine.
///
/// The wall-clock deadline is not part of the policy: it is supplied per run
/// through [`crate::contract::RunLimits`] so an ensemble can propagate one
/// shared deadline to all of its workers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsPolicy {
    /// Hard cap on selection/expansion/rollout/backpropagation iterations.
    pub max_iterations: u64,
    /// `C` in `UCB = normalized_avg + C · sqrt(ln(N_parent) / N_child)`.
    pub exploration_constant: f64,
}

impl MctsPolicy {
    /// Validate the policy before any iteration runs.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidIterationCount`] for a zero budget and
    /// [`SearchError::InvalidExplorationConstant`] for a negative or
    /// non-finite constant.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_iterations == 0 {
            return Err(SearchError::InvalidIterationCount {
                count: self.max_iterations,
            });
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(SearchError::InvalidExplorationConstant {
                value: self.exploration_constant,
            });
        }
        Ok(())
    }
}

impl Default for MctsPolicy {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
        }
    }
}
