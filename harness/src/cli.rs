//! Command-line surface: flag parsing, config layering, and the end-to-end
//! run (load → ensemble → report → motion script).
//!
//! The `sweeproute` binary is a thin wrapper over [`main`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};

use sweeproute_search::search::MctsFactory;

use crate::config::{duration_from_secs, SolverConfig, WorkerCount};
use crate::ensemble::run_ensemble;
use crate::loader::load_targets;
use crate::logging::{init_logger, LogFormat};
use crate::report::RunReport;
use crate::translator::MotionTranslator;

/// Monte Carlo tree search route planner with sweep collection.
#[derive(Parser, Debug)]
#[command(name = "sweeproute", version)]
pub struct Cli {
    /// Target table: one `x y mass` row per target
    #[arg(long)]
    targets: PathBuf,

    /// JSON solver config; flags override its keys
    #[arg(long)]
    config: Option<PathBuf>,

    /// Iteration budget per worker
    #[arg(long)]
    iterations: Option<u64>,

    /// UCB1 exploration constant
    #[arg(long)]
    exploration: Option<f64>,

    /// Wall-clock limit for the whole ensemble, in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Worker count, or `auto` for one per core
    #[arg(long)]
    workers: Option<WorkerCount>,

    /// Base seed for per-worker seed derivation
    #[arg(long)]
    seed: Option<u64>,

    /// Output path of the motion script
    #[arg(long, default_value = "results/robot_script.txt")]
    script: PathBuf,

    /// Optional JSON run report
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace). Defaults to RUST_LOG or info
    #[arg(long)]
    log_level: Option<LevelFilter>,

    /// Log line layout
    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact)]
    log_format: LogFormatArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Compact,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Pretty => Self::Pretty,
        }
    }
}

impl Cli {
    /// Defaults, then the `--config` file, then individual flags.
    ///
    /// # Errors
    ///
    /// Fails if the config file cannot be read or parsed, or the time limit
    /// is not a valid duration.
    pub fn solver_config(&self) -> Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let bytes = std::fs::read(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                SolverConfig::from_json_bytes(&bytes)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => SolverConfig::default(),
        };
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(c) = self.exploration {
            config.exploration_constant = c;
        }
        if let Some(secs) = self.time_limit {
            config.time_limit = Some(duration_from_secs(secs)?);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(seed) = self.seed {
            config.base_seed = seed;
        }
        Ok(config)
    }

    /// Install the logger and run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Any load, config, search, or write failure, with context.
    pub fn run(&self) -> Result<()> {
        init_logger(self.log_level, self.log_format.into()).context("installing logger")?;

        let targets = load_targets(&self.targets)
            .with_context(|| format!("loading targets from {}", self.targets.display()))?;
        let config = self.solver_config()?;
        info!(
            "loaded {} targets; iterations={} workers={} base_seed={}",
            targets.len(),
            config.iterations,
            config.workers,
            config.base_seed
        );

        let outcome = run_ensemble(&MctsFactory, &config, &targets).context("route search failed")?;
        let report = RunReport::new(&config, &targets, &outcome);
        info!(
            "route: targeted={} swept={} missed={} reward={} resource={:.2} time={:.2}",
            report.targeted(),
            report.swept(),
            report.missed(),
            report.trace.evaluation.reward,
            report.trace.evaluation.resource_used,
            report.trace.evaluation.time_used
        );

        let mut translator = MotionTranslator::default();
        translator.follow(report.trace.waypoints(&targets));
        translator
            .export(&self.script)
            .with_context(|| format!("writing motion script {}", self.script.display()))?;
        info!(
            "wrote {} instructions to {}",
            translator.instructions().len(),
            self.script.display()
        );

        if let Some(path) = &self.report {
            report
                .write_report(path)
                .with_context(|| format!("writing report {}", path.display()))?;
            info!("wrote report to {}", path.display());
        }

        println!(
            "best_score={} reward={} path={:?} result_digest={}",
            outcome.best.fitness(),
            report.trace.evaluation.reward,
            outcome.best.outcome.best_path,
            report.result_digest()
        );
        Ok(())
    }
}

/// Parse the process arguments and run.
///
/// # Errors
///
/// See [`Cli::run`].
pub fn main() -> Result<()> {
    Cli::parse().run()
}
