//! Rollout generator: random completion of a visiting-order prefix.

use rand::seq::SliceRandom;
use rand::Rng;

use sweeproute_kernel::instance::collected::CollectedSet;
use sweeproute_kernel::instance::target::{TargetId, TargetSet};
use sweeproute_kernel::motion::evaluate::{evaluate, Evaluation};
use sweeproute_kernel::motion::params::MotionParams;

/// A scored full permutation produced by [`rollout`].
#[derive(Debug, Clone, PartialEq)]
pub struct Rollout {
    pub fitness: f64,
    /// The prefix followed by the shuffled remainder.
    pub path: Vec<TargetId>,
    pub evaluation: Evaluation,
}

/// Complete `prefix` with a uniform shuffle of the unvisited ids and score it.
///
/// The shuffle is the only randomness in the search; `rng` is always supplied
/// by the caller so every worker owns its stream. Prefix ids outside the
/// target set are kept in the path but skipped when scoring, as in
/// [`evaluate`].
pub fn rollout<R>(
    prefix: &[TargetId],
    targets: &TargetSet,
    params: &MotionParams,
    rng: &mut R,
) -> Rollout
where
    R: Rng + ?Sized,
{
    let mut in_prefix = CollectedSet::with_capacity(targets.len());
    for &id in prefix {
        if targets.get(id).is_some() {
            in_prefix.insert(id);
        }
    }

    let mut remaining: Vec<TargetId> = targets.ids().filter(|&id| !in_prefix.contains(id)).collect();
    remaining.shuffle(rng);

    let mut path = Vec::with_capacity(prefix.len() + remaining.len());
    path.extend_from_slice(prefix);
    path.extend_from_slice(&remaining);

    let evaluation = evaluate(&path, targets, params);
    Rollout {
        fitness: evaluation.fitness,
        path,
        evaluation,
    }
}
