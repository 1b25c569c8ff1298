//! Ensemble runner: independent seeded searches raced on a rayon pool.
//!
//! Every worker owns its engine (tree, RNG, score bounds). The only shared
//! state is the read-only target set, the ensemble deadline, and a
//! cancellation flag raised when any worker fails.
//!
//! # Fail-closed semantics
//!
//! - Invalid configuration → error before any worker starts
//! - Colliding derived seeds → [`EnsembleError::SeedCollision`]
//! - A worker that panics or errors → the whole run fails with the lowest
//!   failing worker index; no reduced ensemble is returned

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{info, warn};
use rayon::prelude::*;
use thiserror::Error;

use sweeproute_kernel::digest::hash::{raw_hash, ContentHash, HashDomain};
use sweeproute_kernel::error::KernelError;
use sweeproute_kernel::instance::target::TargetSet;
use sweeproute_search::contract::{EngineFactory, RunLimits};
use sweeproute_search::error::SearchError;
use sweeproute_search::outcome::SearchOutcome;

use crate::config::{ConfigError, SolverConfig, MAX_WORKERS};

/// Domain prefix for per-worker seed derivation.
pub const DOMAIN_WORKER_SEED: HashDomain = HashDomain::WorkerSeed;

/// Typed failure of an ensemble run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnsembleError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid worker count: {count} (must be between 1 and {max})", max = MAX_WORKERS)]
    InvalidWorkerCount { count: usize },
    #[error("invalid time limit: {detail}")]
    InvalidTimeLimit { detail: String },
    /// Motion parameters failed kernel validation.
    #[error("invalid motion parameters: {0}")]
    Motion(KernelError),
    #[error("search configuration rejected: {0}")]
    Search(#[from] SearchError),
    /// Two workers derived the same seed.
    #[error("workers {first} and {second} derived the same seed {seed}")]
    SeedCollision {
        first: usize,
        second: usize,
        seed: u64,
    },
    #[error("thread pool construction failed: {detail}")]
    ThreadPool { detail: String },
    #[error("worker {worker} failed: {detail}")]
    WorkerFailed { worker: usize, detail: String },
}

/// One worker's completed search.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerResult {
    pub worker: usize,
    pub seed: u64,
    pub outcome: SearchOutcome,
}

impl WorkerResult {
    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.outcome.best_score
    }
}

/// Result of a successful ensemble run.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleOutcome {
    /// The winning worker (highest fitness, lowest index on ties).
    pub best: WorkerResult,
    /// Every worker, ordered by worker index.
    pub workers: Vec<WorkerResult>,
    pub engine_id: String,
    /// Digest of the target set the ensemble searched.
    pub instance_digest: ContentHash,
    pub elapsed: Duration,
}

/// Derive worker `worker_index`'s seed from `base_seed`.
///
/// First 8 bytes (little-endian) of
/// `SHA-256(DOMAIN_WORKER_SEED ‖ base_seed_le ‖ worker_index_le)`.
#[must_use]
pub fn derive_worker_seed(base_seed: u64, worker_index: usize) -> u64 {
    let mut data = [0u8; 16];
    data[..8].copy_from_slice(&base_seed.to_le_bytes());
    data[8..].copy_from_slice(&(worker_index as u64).to_le_bytes());
    let digest = raw_hash(DOMAIN_WORKER_SEED, &data);
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(head)
}

/// Seeds for workers `0..count`, checked pairwise distinct.
///
/// # Errors
///
/// Returns [`EnsembleError::SeedCollision`] naming the first colliding pair.
pub fn derive_worker_seeds(base_seed: u64, count: usize) -> Result<Vec<u64>, EnsembleError> {
    let mut seen: BTreeMap<u64, usize> = BTreeMap::new();
    let mut seeds = Vec::with_capacity(count);
    for worker in 0..count {
        let seed = derive_worker_seed(base_seed, worker);
        if let Some(&first) = seen.get(&seed) {
            return Err(EnsembleError::SeedCollision {
                first,
                second: worker,
                seed,
            });
        }
        seen.insert(seed, worker);
        seeds.push(seed);
    }
    Ok(seeds)
}

/// The result with the highest fitness. Ties keep the first seen.
#[must_use]
pub fn select_best(results: &[WorkerResult]) -> Option<&WorkerResult> {
    let mut best: Option<&WorkerResult> = None;
    for r in results {
        let better = match best {
            Some(b) => r.fitness() > b.fitness(),
            None => true,
        };
        if better {
            best = Some(r);
        }
    }
    best
}

/// Run `config.workers` independent engines over `targets` and keep the best.
///
/// Every engine runs `config.policy()`; the factory only decides which
/// engine implementation to build.
///
/// # Errors
///
/// Returns [`EnsembleError`] for configuration failures (before any worker
/// starts), seed collisions, thread pool failures, and any worker failure.
pub fn run_ensemble(
    factory: &dyn EngineFactory,
    config: &SolverConfig,
    targets: &TargetSet,
) -> Result<EnsembleOutcome, EnsembleError> {
    config.validate()?;
    let policy = config.policy();
    factory.validate(&policy)?;

    let worker_count = config.workers.resolve();
    if worker_count == 0 || worker_count > MAX_WORKERS {
        return Err(EnsembleError::InvalidWorkerCount {
            count: worker_count,
        });
    }
    let seeds = derive_worker_seeds(config.base_seed, worker_count)?;
    let instance_digest = targets.digest();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .thread_name(|i| format!("sweeproute-worker-{i}"))
        .build()
        .map_err(|e| EnsembleError::ThreadPool {
            detail: e.to_string(),
        })?;

    let started = Instant::now();
    let deadline = config.time_limit.and_then(|d| started.checked_add(d));
    let cancel = AtomicBool::new(false);
    info!(
        "ensemble start: engine={} workers={worker_count} targets={} base_seed={} instance={}",
        factory.engine_id(),
        targets.len(),
        config.base_seed,
        instance_digest
    );

    let results: Vec<Result<WorkerResult, EnsembleError>> = pool.install(|| {
        seeds
            .par_iter()
            .enumerate()
            .map(|(worker, &seed)| {
                run_worker(factory, config, targets, worker, seed, deadline, &cancel)
            })
            .collect()
    });

    let mut workers = Vec::with_capacity(worker_count);
    for result in results {
        workers.push(result?);
    }
    let best = select_best(&workers)
        .cloned()
        .ok_or(EnsembleError::InvalidWorkerCount { count: 0 })?;
    let elapsed = started.elapsed();
    info!(
        "ensemble done: best worker={} seed={} score={:.2} reward={} in {:.3}s",
        best.worker,
        best.seed,
        best.fitness(),
        best.outcome.evaluation.reward,
        elapsed.as_secs_f64()
    );

    Ok(EnsembleOutcome {
        best,
        workers,
        engine_id: factory.engine_id().to_string(),
        instance_digest,
        elapsed,
    })
}

fn run_worker(
    factory: &dyn EngineFactory,
    config: &SolverConfig,
    targets: &TargetSet,
    worker: usize,
    seed: u64,
    deadline: Option<Instant>,
    cancel: &AtomicBool,
) -> Result<WorkerResult, EnsembleError> {
    let limits = RunLimits {
        deadline,
        cancel: Some(cancel),
    };
    let run = catch_unwind(AssertUnwindSafe(|| {
        let mut engine = factory.build(worker, seed, &config.policy());
        engine.run(targets, &config.motion, limits)
    }));

    let failure = match run {
        Ok(Ok(outcome)) => {
            info!(
                "worker {worker}: seed={seed} iterations={} termination={} score={:.2}",
                outcome.iterations, outcome.termination, outcome.best_score
            );
            return Ok(WorkerResult {
                worker,
                seed,
                outcome,
            });
        }
        Ok(Err(e)) => e.to_string(),
        Err(payload) => format!("panicked: {}", panic_detail(payload.as_ref())),
    };
    cancel.store(true, Ordering::Relaxed);
    warn!("worker {worker} failed, cancelling ensemble: {failure}");
    Err(EnsembleError::WorkerFailed {
        worker,
        detail: failure,
    })
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
