//! `SweepRoute` Kernel: the deterministic core of route evaluation.
//!
//! # API Surface
//!
//! - [`instance::target::TargetSet`] -- the immutable, validated target table
//! - [`motion::evaluate::evaluate`] -- score a visiting order under the motion model
//! - [`motion::evaluate::trace_route`] -- the same simulation, with per-target outcomes
//! - [`digest::hash::canonical_hash`] -- domain-separated SHA-256 commitments
//!
//! # Module Dependency Direction
//!
//! `digest` ← `instance` ← `motion`
//!
//! One-way only. No cycles. Nothing in the kernel draws randomness or reads
//! the clock.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod digest;
pub mod error;
pub mod instance;
pub mod motion;
