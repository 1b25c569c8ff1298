//! Instance module: targets and the collected-set bit array.
//!
//! Depends on `digest`. Nothing here is mutated after construction except
//! [`collected::CollectedSet`], which is simulation-local.

pub mod collected;
pub mod target;
