//! Sweeproute Search: Monte Carlo tree search over target visiting orders.
//!
//! This crate depends only on `sweeproute_kernel`. It does NOT depend on
//! `sweeproute_harness`.
//!
//! # Crate dependency graph
//!
//! ```text
//! sweeproute_kernel  ←  sweeproute_search  ←  sweeproute_harness
//! (targets, motion)     (tree, rollout)        (ensemble, I/O, CLI)
//! ```
//!
//! # Key types
//!
//! - [`MctsEngine`]: one seeded search: select, expand, roll out, backpropagate
//! - [`SearchTree`]: arena of prefix nodes with visit statistics
//! - [`ScoreBounds`]: running min/max for UCB1 value normalization
//! - [`MctsPolicy`]: iteration budget and exploration constant
//! - [`RouteEngine`] / [`EngineFactory`]: the seam the ensemble runs through
//! - [`SearchOutcome`]: best route, score, and [`TerminationReason`]

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod contract;
pub mod error;
pub mod node;
pub mod outcome;
pub mod policy;
pub mod rollout;
pub mod scorer;
pub mod search;
pub mod tree;

pub use contract::{EngineFactory, RouteEngine, RunLimits};
pub use error::SearchError;
pub use outcome::{SearchOutcome, TerminationReason};
pub use policy::MctsPolicy;
pub use scorer::ScoreBounds;
pub use search::{MctsEngine, MctsFactory};
pub use tree::SearchTree;
