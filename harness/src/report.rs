//! Run report: route classification and JSON output.
//!
//! The report splits into a deterministic body (instance, config, routes,
//! scores, per-target statuses) and observational timing. `result_digest`
//! commits to the body only, so two runs with equal inputs, base seed and
//! worker count produce equal digests when no deadline fires.

use std::path::Path;

use thiserror::Error;

use sweeproute_kernel::digest::hash::{canonical_hash, ContentHash, HashDomain};
use sweeproute_kernel::instance::target::{route_digest, TargetSet};
use sweeproute_kernel::motion::evaluate::{trace_route, RouteTrace, TargetStatus};
use sweeproute_search::outcome::evaluation_to_json;

use crate::config::SolverConfig;
use crate::ensemble::{EnsembleOutcome, WorkerResult};

/// Domain prefix for the report result digest.
pub const DOMAIN_RUN_REPORT: HashDomain = HashDomain::RunReport;

/// Error writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("report I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything known about one finished ensemble run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub config: SolverConfig,
    pub outcome: EnsembleOutcome,
    /// Replay of the winning route with per-target statuses.
    pub trace: RouteTrace,
}

impl RunReport {
    /// Classify the winning route against `targets`.
    #[must_use]
    pub fn new(config: &SolverConfig, targets: &TargetSet, outcome: &EnsembleOutcome) -> Self {
        let trace = trace_route(&outcome.best.outcome.best_path, targets, &config.motion);
        Self {
            config: config.clone(),
            outcome: outcome.clone(),
            trace,
        }
    }

    #[must_use]
    pub fn targeted(&self) -> usize {
        self.trace.count(TargetStatus::Targeted)
    }

    #[must_use]
    pub fn swept(&self) -> usize {
        self.trace.count(TargetStatus::Swept)
    }

    #[must_use]
    pub fn missed(&self) -> usize {
        self.trace.count(TargetStatus::Missed)
    }

    /// Commitment over the deterministic report body.
    #[must_use]
    pub fn result_digest(&self) -> ContentHash {
        let body = self.body_json();
        canonical_hash(DOMAIN_RUN_REPORT, body.to_string().as_bytes())
    }

    fn body_json(&self) -> serde_json::Value {
        let best = &self.outcome.best;
        let statuses: Vec<&str> = self.trace.statuses.iter().map(|s| s.as_str()).collect();
        serde_json::json!({
            "best": {
                "path": best.outcome.best_path,
                "route_digest": route_digest(&best.outcome.best_path).as_str(),
                "score": best.outcome.best_score,
                "seed": best.seed,
                "worker": best.worker,
            },
            "classification": {
                "missed": self.missed(),
                "statuses": statuses,
                "swept": self.swept(),
                "swept_ids": self.trace.swept,
                "targeted": self.targeted(),
                "targeted_ids": self.trace.targeted,
            },
            "config": self.config.to_json_value(),
            "engine_id": self.outcome.engine_id,
            "evaluation": evaluation_to_json(&self.trace.evaluation),
            "instance_digest": self.outcome.instance_digest.as_str(),
            "workers": self.outcome.workers.iter().map(worker_json).collect::<Vec<_>>(),
        })
    }

    /// Full report, including timing and the result digest.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut value = self.body_json();
        if let Some(map) = value.as_object_mut() {
            map.insert(
                "elapsed_ms".to_string(),
                serde_json::json!(u64::try_from(self.outcome.elapsed.as_millis()).unwrap_or(u64::MAX)),
            );
            map.insert(
                "result_digest".to_string(),
                serde_json::json!(self.result_digest().as_str()),
            );
        }
        value
    }

    /// Write the report as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] on serialization or I/O failure.
    pub fn write_report(&self, path: &Path) -> Result<(), ReportError> {
        let bytes = serde_json::to_vec_pretty(&self.to_json_value())?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn worker_json(w: &WorkerResult) -> serde_json::Value {
    serde_json::json!({
        "iterations": w.outcome.iterations,
        "reward": w.outcome.evaluation.reward,
        "score": w.outcome.best_score,
        "seed": w.seed,
        "termination_reason": w.outcome.termination.as_str(),
        "tree_size": w.outcome.tree_size,
        "worker": w.worker,
    })
}
