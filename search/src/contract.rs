//! Engine contract traits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use sweeproute_kernel::instance::target::TargetSet;
use sweeproute_kernel::motion::params::MotionParams;

use crate::error::SearchError;
use crate::outcome::{SearchOutcome, TerminationReason};
use crate::policy::MctsPolicy;

/// Per-run stop conditions supplied by the caller.
///
/// Both are checked once per iteration, before the iteration starts; an
/// iteration in progress always completes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunLimits<'a> {
    /// Wall-clock deadline.
    pub deadline: Option<Instant>,
    /// Cooperative cancellation flag, raised by the caller.
    pub cancel: Option<&'a AtomicBool>,
}

impl<'a> RunLimits<'a> {
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: &'a AtomicBool) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// The reason to stop now, if any. Cancellation wins over the deadline.
    #[must_use]
    pub fn stop_reason(&self) -> Option<TerminationReason> {
        if self.cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Some(TerminationReason::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(TerminationReason::DeadlineReached);
        }
        None
    }
}

/// A route search that can be run by the ensemble.
///
/// # Contract
///
/// - `run` must not mutate or retain `targets`.
/// - Runs with equal inputs and equal seeds must return equal routes and
///   scores (timing fields aside) when no deadline or cancellation fires.
/// - Pre-flight validation failures are the only errors; every other stop is
///   a [`TerminationReason`].
pub trait RouteEngine: Send {
    /// Seed of this engine's random stream.
    fn seed(&self) -> u64;

    /// Search for the best visiting order.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the configuration fails validation.
    fn run(
        &mut self,
        targets: &TargetSet,
        params: &MotionParams,
        limits: RunLimits<'_>,
    ) -> Result<SearchOutcome, SearchError>;
}

/// Builds one independent engine per ensemble worker.
///
/// The policy is owned by the caller's run configuration and handed to the
/// factory on every call; factories hold no policy of their own.
pub trait EngineFactory: Sync {
    /// Short identifier used in logs and reports.
    fn engine_id(&self) -> &str;

    /// Check `policy` once, before any worker starts.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] for an invalid configuration.
    fn validate(&self, policy: &MctsPolicy) -> Result<(), SearchError>;

    /// A fresh engine for `worker`, seeded with `seed`, running `policy`.
    fn build(&self, worker: usize, seed: u64, policy: &MctsPolicy) -> Box<dyn RouteEngine>;
}
