//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Runtime stops (iteration
//! budget, deadline, cancellation, tree invariant violations) are expressed
//! via [`crate::outcome::TerminationReason`] and always produce a
//! [`crate::outcome::SearchOutcome`].

use thiserror::Error;

/// Typed failure for pre-flight search validation.
///
/// These errors are returned before the first iteration. No outcome is
/// produced because no search steps were taken.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The iteration budget must allow at least one iteration.
    #[error("invalid iteration count: {count} (must be at least 1)")]
    InvalidIterationCount { count: u64 },
    /// The exploration constant must be finite and non-negative.
    #[error("invalid exploration constant: {value} (must be finite and >= 0)")]
    InvalidExplorationConstant { value: f64 },
    /// Motion parameters failed kernel validation.
    #[error("invalid motion parameters: {0}")]
    Motion(#[from] sweeproute_kernel::error::KernelError),
}
