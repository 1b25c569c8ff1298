//! Solver configuration: defaults, JSON file overlay, validation.
//!
//! A [`SolverConfig`] is assembled in layers: [`SolverConfig::default`], then
//! an optional JSON file ([`SolverConfig::from_json_bytes`]), then CLI flags.
//! Nothing is checked while layering; [`SolverConfig::validate`] runs once,
//! before any worker starts.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use sweeproute_kernel::motion::params::MotionParams;
use sweeproute_search::policy::{MctsPolicy, DEFAULT_EXPLORATION_CONSTANT, DEFAULT_MAX_ITERATIONS};

use crate::ensemble::EnsembleError;

/// Error reading a configuration file or a worker-count string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The file is not valid JSON or does not match the schema.
    #[error("config parse error: {detail}")]
    Parse { detail: String },
    /// `workers` is neither a positive integer nor `"auto"`.
    #[error("invalid worker count {value:?}: expected a positive integer or \"auto\"")]
    InvalidWorkers { value: String },
    /// `time_limit_secs` is negative, NaN, or too large for a `Duration`.
    #[error("invalid time limit {value}: expected a finite, non-negative number of seconds")]
    InvalidTimeLimit { value: String },
}

/// Upper bound on the ensemble size; each worker gets its own OS thread.
pub const MAX_WORKERS: usize = 256;

/// How many ensemble workers to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerCount {
    /// One worker per rayon thread (`rayon::current_num_threads()`).
    #[default]
    Auto,
    Fixed(usize),
}

impl WorkerCount {
    /// Concrete worker count on this machine. `Auto` never exceeds
    /// [`MAX_WORKERS`].
    #[must_use]
    pub fn resolve(self) -> usize {
        match self {
            Self::Auto => rayon::current_num_threads().clamp(1, MAX_WORKERS),
            Self::Fixed(n) => n,
        }
    }
}

impl FromStr for WorkerCount {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        trimmed
            .parse::<usize>()
            .map(Self::Fixed)
            .map_err(|_| ConfigError::InvalidWorkers {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(n) => write!(f, "{n}"),
        }
    }
}

/// Everything one ensemble run needs besides the targets.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Iteration budget per worker.
    pub iterations: u64,
    pub exploration_constant: f64,
    /// Wall-clock limit for the whole ensemble. `None` runs to the budget.
    pub time_limit: Option<Duration>,
    pub workers: WorkerCount,
    /// Root of the per-worker seed derivation.
    pub base_seed: u64,
    pub motion: MotionParams,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_MAX_ITERATIONS,
            exploration_constant: DEFAULT_EXPLORATION_CONSTANT,
            time_limit: None,
            workers: WorkerCount::Auto,
            base_seed: 0,
            motion: MotionParams::default(),
        }
    }
}

impl SolverConfig {
    /// Defaults overlaid with the keys present in a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on malformed JSON, unknown keys, or an
    /// unparseable `workers` / `time_limit_secs` value.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse {
            detail: e.to_string(),
        })?;
        let mut config = Self::default();
        config.apply_file(file)?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        if let Some(iterations) = file.iterations {
            self.iterations = iterations;
        }
        if let Some(c) = file.exploration_constant {
            self.exploration_constant = c;
        }
        if let Some(secs) = file.time_limit_secs {
            self.time_limit = Some(duration_from_secs(secs)?);
        }
        if let Some(workers) = file.workers {
            self.workers = match workers {
                WorkersField::Count(n) => WorkerCount::Fixed(n),
                WorkersField::Keyword(s) => s.parse()?,
            };
        }
        if let Some(seed) = file.base_seed {
            self.base_seed = seed;
        }
        if let Some(motion) = file.motion {
            motion.apply_to(&mut self.motion);
        }
        Ok(())
    }

    /// Search policy handed to every engine.
    #[must_use]
    pub fn policy(&self) -> MctsPolicy {
        MctsPolicy {
            max_iterations: self.iterations,
            exploration_constant: self.exploration_constant,
        }
    }

    /// Reject configurations that cannot run.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as an [`EnsembleError`].
    pub fn validate(&self) -> Result<(), EnsembleError> {
        self.policy().validate()?;
        self.motion.validate().map_err(EnsembleError::Motion)?;
        if let WorkerCount::Fixed(count) = self.workers {
            if count == 0 || count > MAX_WORKERS {
                return Err(EnsembleError::InvalidWorkerCount { count });
            }
        }
        if self.time_limit == Some(Duration::ZERO) {
            return Err(EnsembleError::InvalidTimeLimit {
                detail: "time limit must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// JSON view recorded in run reports.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "base_seed": self.base_seed,
            "exploration_constant": self.exploration_constant,
            "iterations": self.iterations,
            "motion": motion_to_json(&self.motion),
            "time_limit_secs": self.time_limit.map(|d| d.as_secs_f64()),
            "workers": self.workers.to_string(),
        })
    }
}

/// Parse seconds as a `Duration`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidTimeLimit`] for negative, NaN, or overflowing
/// values.
pub fn duration_from_secs(secs: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeLimit {
        value: secs.to_string(),
    })
}

fn motion_to_json(m: &MotionParams) -> serde_json::Value {
    serde_json::json!({
        "base_draw": m.base_draw,
        "collision_radius": m.collision_radius,
        "draw_per_mass": m.draw_per_mass,
        "resource_budget": m.resource_budget,
        "speed_decay": m.speed_decay,
        "time_budget": m.time_budget,
        "v0": m.v0,
    })
}

// ---------------------------------------------------------------------------
// File schema
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    iterations: Option<u64>,
    exploration_constant: Option<f64>,
    time_limit_secs: Option<f64>,
    workers: Option<WorkersField>,
    base_seed: Option<u64>,
    motion: Option<MotionFile>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkersField {
    Count(usize),
    Keyword(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MotionFile {
    v0: Option<f64>,
    speed_decay: Option<f64>,
    draw_per_mass: Option<f64>,
    base_draw: Option<f64>,
    time_budget: Option<f64>,
    resource_budget: Option<f64>,
    collision_radius: Option<f64>,
}

impl MotionFile {
    fn apply_to(self, m: &mut MotionParams) {
        let fields = [
            (self.v0, &mut m.v0),
            (self.speed_decay, &mut m.speed_decay),
            (self.draw_per_mass, &mut m.draw_per_mass),
            (self.base_draw, &mut m.base_draw),
            (self.time_budget, &mut m.time_budget),
            (self.resource_budget, &mut m.resource_budget),
            (self.collision_radius, &mut m.collision_radius),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
}
