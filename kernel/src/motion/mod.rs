//! Motion module: parameters, segment geometry, and the path evaluator.
//!
//! Depends on `instance`.

pub mod evaluate;
pub mod geometry;
pub mod params;
