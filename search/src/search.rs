//! MCTS engine: selection, expansion, rollout, backpropagation.

use std::time::Instant;

use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sweeproute_kernel::instance::target::{TargetId, TargetSet};
use sweeproute_kernel::motion::evaluate::evaluate;
use sweeproute_kernel::motion::params::MotionParams;

use crate::contract::{EngineFactory, RouteEngine, RunLimits};
use crate::error::SearchError;
use crate::outcome::{SearchOutcome, TerminationReason};
use crate::policy::MctsPolicy;
use crate::rollout::{rollout, Rollout};
use crate::scorer::ScoreBounds;
use crate::tree::{SearchTree, ROOT};

/// One Monte Carlo tree search instance.
///
/// Owns its random stream. Each [`MctsEngine::search`] call builds a fresh
/// tree and fresh score bounds; the last tree stays readable through
/// [`MctsEngine::tree`] until the next run.
#[derive(Debug)]
pub struct MctsEngine {
    policy: MctsPolicy,
    seed: u64,
    rng: ChaCha8Rng,
    tree: Option<SearchTree>,
}

impl MctsEngine {
    #[must_use]
    pub fn new(policy: MctsPolicy, seed: u64) -> Self {
        Self {
            policy,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            tree: None,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &MctsPolicy {
        &self.policy
    }

    /// The tree of the most recent run, if any.
    #[must_use]
    pub fn tree(&self) -> Option<&SearchTree> {
        self.tree.as_ref()
    }

    /// Run the search loop until the iteration budget, the deadline, or a
    /// cancellation stops it.
    ///
    /// Runtime stops return `Ok` with the best route sampled so far. If the
    /// very first iteration is pre-empted, the outcome scores the identity
    /// order `[0, 1, …, n−1]`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] only for pre-flight validation failures of the
    /// policy or the motion parameters.
    pub fn search(
        &mut self,
        targets: &TargetSet,
        params: &MotionParams,
        limits: RunLimits<'_>,
    ) -> Result<SearchOutcome, SearchError> {
        self.policy.validate()?;
        params.validate()?;

        let started = Instant::now();
        let n = targets.len();
        debug!(
            "mcts start: seed={} targets={n} max_iterations={} c={}",
            self.seed, self.policy.max_iterations, self.policy.exploration_constant
        );

        if n == 0 {
            self.tree = None;
            let evaluation = evaluate(&[], targets, params);
            return Ok(SearchOutcome {
                best_path: Vec::new(),
                best_score: evaluation.fitness,
                evaluation,
                iterations: 0,
                termination: TerminationReason::EmptyInstance,
                tree_size: 0,
                seed: self.seed,
                elapsed: started.elapsed(),
            });
        }

        let mut tree = SearchTree::new(n);
        let mut bounds = ScoreBounds::new();
        let mut best: Option<Rollout> = None;
        let mut iterations: u64 = 0;

        let termination = 'search: loop {
            if iterations >= self.policy.max_iterations {
                break TerminationReason::IterationBudgetReached;
            }
            if let Some(reason) = limits.stop_reason() {
                break reason;
            }

            // Selection
            let mut node = ROOT;
            while tree.is_fully_expanded(node) {
                let Some(child) =
                    tree.select_child(node, &bounds, self.policy.exploration_constant)
                else {
                    break 'search TerminationReason::TreeInvariantViolation;
                };
                node = child;
            }

            // Expansion
            if let Some(child) = tree.expand(node, &mut self.rng) {
                node = child;
            }

            // Rollout
            let prefix = tree.prefix(node);
            let result = rollout(&prefix, targets, params, &mut self.rng);

            // Backpropagation
            tree.backpropagate(node, result.fitness);
            bounds.observe(result.fitness);

            let improved = match &best {
                Some(b) => result.fitness > b.fitness,
                None => true,
            };
            if improved {
                best = Some(result);
            }
            iterations += 1;
        };

        if termination == TerminationReason::TreeInvariantViolation {
            warn!(
                "mcts seed={} stopped on a tree invariant violation after {iterations} iterations",
                self.seed
            );
        }

        let (best_path, evaluation) = match best {
            Some(r) => (r.path, r.evaluation),
            None => {
                let identity: Vec<TargetId> = targets.ids().collect();
                let evaluation = evaluate(&identity, targets, params);
                (identity, evaluation)
            }
        };

        let outcome = SearchOutcome {
            best_score: evaluation.fitness,
            best_path,
            evaluation,
            iterations,
            termination,
            tree_size: tree.len(),
            seed: self.seed,
            elapsed: started.elapsed(),
        };
        debug!(
            "mcts done: seed={} iterations={} termination={} best_score={:.2} reward={}",
            self.seed,
            outcome.iterations,
            outcome.termination,
            outcome.best_score,
            outcome.evaluation.reward
        );
        self.tree = Some(tree);
        Ok(outcome)
    }
}

impl RouteEngine for MctsEngine {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn run(
        &mut self,
        targets: &TargetSet,
        params: &MotionParams,
        limits: RunLimits<'_>,
    ) -> Result<SearchOutcome, SearchError> {
        self.search(targets, params, limits)
    }
}

/// Builds one [`MctsEngine`] per worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct MctsFactory;

impl EngineFactory for MctsFactory {
    fn engine_id(&self) -> &str {
        "mcts"
    }

    fn validate(&self, policy: &MctsPolicy) -> Result<(), SearchError> {
        policy.validate()
    }

    fn build(&self, _worker: usize, seed: u64, policy: &MctsPolicy) -> Box<dyn RouteEngine> {
        Box::new(MctsEngine::new(*policy, seed))
    }
}
