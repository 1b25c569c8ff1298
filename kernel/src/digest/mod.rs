//! Digest module: domain-separated SHA-256 commitments.
//!
//! Depends on nothing internal.

pub mod hash;
pub mod hash_domain;
