//! Ensemble runner lock tests: max selection, seed derivation, pre-flight
//! rejection, fail-closed worker failures, deadline propagation, and the
//! three-target end-to-end example.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use lock_tests::fixtures::{generous_params, scattered, three_targets};
use sweeproute_harness::config::{SolverConfig, WorkerCount};
use sweeproute_harness::ensemble::{derive_worker_seed, run_ensemble, EnsembleError};
use sweeproute_kernel::instance::target::TargetSet;
use sweeproute_kernel::motion::evaluate::{evaluate, REWARD_WEIGHT};
use sweeproute_kernel::motion::params::MotionParams;
use sweeproute_search::contract::{EngineFactory, RouteEngine, RunLimits};
use sweeproute_search::error::SearchError;
use sweeproute_search::outcome::{SearchOutcome, TerminationReason};
use sweeproute_search::policy::MctsPolicy;
use sweeproute_search::search::{MctsEngine, MctsFactory};

fn config(workers: usize, iterations: u64, base_seed: u64) -> SolverConfig {
    SolverConfig {
        iterations,
        workers: WorkerCount::Fixed(workers),
        base_seed,
        motion: generous_params(),
        ..SolverConfig::default()
    }
}

/// Wraps the MCTS factory; one chosen worker misbehaves. Records every
/// policy it is asked to build with.
struct FaultyFactory {
    inner: MctsFactory,
    faulty_worker: usize,
    mode: Fault,
    builds: AtomicUsize,
    policies: Mutex<Vec<MctsPolicy>>,
}

#[derive(Clone, Copy, PartialEq)]
enum Fault {
    Panic,
    Error,
    /// Rejects every policy at validation.
    Reject,
}

struct FaultyEngine {
    seed: u64,
    mode: Fault,
}

impl RouteEngine for FaultyEngine {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn run(
        &mut self,
        _targets: &TargetSet,
        _params: &MotionParams,
        _limits: RunLimits<'_>,
    ) -> Result<SearchOutcome, SearchError> {
        match self.mode {
            Fault::Panic => panic!("injected worker fault"),
            Fault::Error | Fault::Reject => Err(SearchError::InvalidIterationCount { count: 0 }),
        }
    }
}

impl FaultyFactory {
    fn new(faulty_worker: usize, mode: Fault) -> Self {
        Self {
            inner: MctsFactory,
            faulty_worker,
            mode,
            builds: AtomicUsize::new(0),
            policies: Mutex::new(Vec::new()),
        }
    }
}

impl EngineFactory for FaultyFactory {
    fn engine_id(&self) -> &str {
        "faulty"
    }

    fn validate(&self, policy: &MctsPolicy) -> Result<(), SearchError> {
        if self.mode == Fault::Reject {
            return Err(SearchError::InvalidIterationCount {
                count: policy.max_iterations,
            });
        }
        self.inner.validate(policy)
    }

    fn build(&self, worker: usize, seed: u64, policy: &MctsPolicy) -> Box<dyn RouteEngine> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        self.policies.lock().unwrap().push(*policy);
        if worker == self.faulty_worker {
            Box::new(FaultyEngine {
                seed,
                mode: self.mode,
            })
        } else {
            self.inner.build(worker, seed, policy)
        }
    }
}

// ---------------------------------------------------------------------------
// Selection and seeds
// ---------------------------------------------------------------------------

#[test]
fn ensemble_returns_maximum_over_independent_runs() {
    let targets = scattered(8, 6.0, 3);
    let cfg = config(4, 400, 11);
    let out = run_ensemble(&MctsFactory, &cfg, &targets).unwrap();

    // Re-run each worker alone with its derived seed: same results.
    for w in &out.workers {
        assert_eq!(w.seed, derive_worker_seed(11, w.worker));
        let alone = MctsEngine::new(cfg.policy(), w.seed)
            .search(&targets, &cfg.motion, RunLimits::default())
            .unwrap();
        assert_eq!(alone.best_path, w.outcome.best_path);
        assert_eq!(alone.best_score.to_bits(), w.fitness().to_bits());
    }

    let max = out.workers.iter().map(|w| w.fitness()).fold(f64::NEG_INFINITY, f64::max);
    assert_eq!(out.best.fitness().to_bits(), max.to_bits());
    let first_max = out.workers.iter().find(|w| w.fitness().to_bits() == max.to_bits()).unwrap();
    assert_eq!(out.best.worker, first_max.worker, "ties keep the lowest worker");
}

#[test]
fn best_score_matches_reevaluation() {
    let targets = scattered(10, 8.0, 4);
    let cfg = config(3, 300, 2);
    let out = run_ensemble(&MctsFactory, &cfg, &targets).unwrap();
    let e = evaluate(&out.best.outcome.best_path, &targets, &cfg.motion);
    assert_eq!(e.fitness.to_bits(), out.best.fitness().to_bits());
}

#[test]
fn worker_seeds_do_not_depend_on_worker_count() {
    let targets = scattered(5, 4.0, 5);
    let small = config(2, 50, 77);
    let large = config(5, 50, 77);
    let a = run_ensemble(&MctsFactory, &small, &targets).unwrap();
    let b = run_ensemble(&MctsFactory, &large, &targets).unwrap();
    for (x, y) in a.workers.iter().zip(&b.workers) {
        assert_eq!(x.seed, y.seed);
        assert_eq!(x.outcome.best_path, y.outcome.best_path);
    }
}

// ---------------------------------------------------------------------------
// Pre-flight rejection
// ---------------------------------------------------------------------------

#[test]
fn config_errors_surface_before_any_worker_is_built() {
    let targets = three_targets();
    let cases = [
        SolverConfig {
            iterations: 0,
            ..config(2, 10, 0)
        },
        SolverConfig {
            exploration_constant: -1.0,
            ..config(2, 10, 0)
        },
        SolverConfig {
            time_limit: Some(Duration::ZERO),
            ..config(2, 10, 0)
        },
        config(0, 10, 0),
        SolverConfig {
            motion: MotionParams {
                v0: f64::NAN,
                ..MotionParams::default()
            },
            ..config(2, 10, 0)
        },
    ];
    for cfg in cases {
        let factory = FaultyFactory::new(usize::MAX, Fault::Panic);
        assert!(run_ensemble(&factory, &cfg, &targets).is_err());
        assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
    }
}

#[test]
fn factory_validation_runs_before_workers() {
    let cfg = config(2, 10, 0);
    let factory = FaultyFactory::new(usize::MAX, Fault::Reject);
    let err = run_ensemble(&factory, &cfg, &three_targets()).unwrap_err();
    assert_eq!(
        err,
        EnsembleError::Search(SearchError::InvalidIterationCount { count: 10 })
    );
    assert_eq!(factory.builds.load(Ordering::SeqCst), 0);
}

#[test]
fn every_worker_runs_the_configured_policy() {
    let cfg = SolverConfig {
        exploration_constant: 0.5,
        ..config(3, 5, 4)
    };
    let factory = FaultyFactory::new(usize::MAX, Fault::Panic);
    let out = run_ensemble(&factory, &cfg, &scattered(6, 5.0, 8)).unwrap();
    for w in &out.workers {
        assert_eq!(w.outcome.iterations, 5);
        assert_eq!(w.outcome.termination, TerminationReason::IterationBudgetReached);
    }
    let policies = factory.policies.lock().unwrap();
    assert_eq!(policies.len(), 3);
    assert!(policies.iter().all(|p| *p == cfg.policy()));
}

// ---------------------------------------------------------------------------
// Worker failure
// ---------------------------------------------------------------------------

#[test]
fn panicking_worker_fails_the_run() {
    let cfg = config(3, 200, 1);
    let factory = FaultyFactory::new(1, Fault::Panic);
    let err = run_ensemble(&factory, &cfg, &three_targets()).unwrap_err();
    match err {
        EnsembleError::WorkerFailed { worker, detail } => {
            assert_eq!(worker, 1);
            assert!(detail.contains("injected worker fault"), "detail: {detail}");
        }
        other => panic!("expected WorkerFailed, got {other:?}"),
    }
}

#[test]
fn erroring_worker_fails_the_run() {
    let cfg = config(2, 200, 1);
    let factory = FaultyFactory::new(0, Fault::Error);
    let err = run_ensemble(&factory, &cfg, &three_targets()).unwrap_err();
    assert!(matches!(err, EnsembleError::WorkerFailed { worker: 0, .. }));
}

// ---------------------------------------------------------------------------
// Deadline
// ---------------------------------------------------------------------------

#[test]
fn ensemble_deadline_stops_every_worker() {
    let targets = scattered(40, 20.0, 6);
    let cfg = SolverConfig {
        time_limit: Some(Duration::from_millis(150)),
        ..config(2, u64::MAX, 3)
    };
    let out = run_ensemble(&MctsFactory, &cfg, &targets).unwrap();
    for w in &out.workers {
        assert_eq!(w.outcome.termination, TerminationReason::DeadlineReached);
        assert!(w.outcome.iterations < u64::MAX);
        assert_eq!(w.outcome.best_path.len(), 40);
    }
    assert!(out.elapsed < Duration::from_secs(30));
}

// ---------------------------------------------------------------------------
// End-to-end example
// ---------------------------------------------------------------------------

#[test]
fn three_target_example_end_to_end() {
    let targets = three_targets();
    let cfg = config(2, 10_000, 0);
    let out = run_ensemble(&MctsFactory, &cfg, &targets).unwrap();
    let best = &out.best.outcome;
    assert!((best.evaluation.reward - 3.0).abs() < 1e-12);
    assert!(best.best_score > 3.0 * REWARD_WEIGHT);
    assert!(best.best_score < 4.0 * REWARD_WEIGHT);
    assert_eq!(best.termination, TerminationReason::IterationBudgetReached);
}

#[test]
fn empty_instance_runs_to_empty_route() {
    let cfg = config(2, 100, 0);
    let out = run_ensemble(&MctsFactory, &cfg, &TargetSet::default()).unwrap();
    assert!(out.best.outcome.best_path.is_empty());
    assert_eq!(out.best.outcome.termination, TerminationReason::EmptyInstance);
}
