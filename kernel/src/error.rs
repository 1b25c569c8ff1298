//! Typed kernel errors.
//!
//! `KernelError` covers construction-time validation only. The evaluator itself
//! has no failure path: budget exhaustion is a normal early stop.

use thiserror::Error;

/// Typed failure for instance and parameter validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// A target coordinate or mass is NaN or infinite.
    #[error("target {id} has a non-finite {field}: {value}")]
    NonFiniteTarget {
        id: usize,
        field: &'static str,
        value: f64,
    },
    /// The instance holds more targets than a `TargetId` can address.
    #[error("instance has {count} targets, more than the addressable maximum")]
    TooManyTargets { count: usize },
    /// A motion parameter is outside its valid range.
    #[error("invalid motion parameter {name}={value}: {detail}")]
    InvalidMotionParam {
        name: &'static str,
        value: f64,
        detail: &'static str,
    },
}
