//! Shared helpers for sweeproute benchmark suites.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use sweeproute_kernel::instance::target::{TargetId, TargetRow, TargetSet};
use sweeproute_kernel::motion::params::MotionParams;

/// A named benchmark instance.
pub struct Scenario {
    pub name: &'static str,
    pub targets: TargetSet,
    pub params: MotionParams,
}

/// `n` targets over `[-extent, extent]²`, masses in `[0.2, 2.0)`.
///
/// # Panics
///
/// Panics if the generated table is rejected. Benchmark setup failures are fatal.
#[must_use]
pub fn scattered(n: usize, extent: f64, seed: u64) -> TargetSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows: Vec<TargetRow> = (0..n)
        .map(|_| TargetRow {
            x: rng.gen_range(-extent..extent),
            y: rng.gen_range(-extent..extent),
            mass: rng.gen_range(0.2..2.0),
        })
        .collect();
    TargetSet::from_rows(rows).expect("scattered table")
}

/// Small, medium and large instances under default budgets.
#[must_use]
pub fn scenarios() -> Vec<Scenario> {
    [("n10", 10, 8.0), ("n50", 50, 20.0), ("n200", 200, 40.0)]
        .into_iter()
        .map(|(name, n, extent)| Scenario {
            name,
            targets: scattered(n, extent, 7),
            params: MotionParams::default(),
        })
        .collect()
}

/// A uniformly shuffled full visiting order.
#[must_use]
pub fn random_order(targets: &TargetSet, seed: u64) -> Vec<TargetId> {
    let mut order: Vec<TargetId> = targets.ids().collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));
    order
}
