//! Sweeproute Harness: ensemble orchestration and the program's I/O edges.
//!
//! The harness races independent MCTS engines on a rayon pool and picks the
//! best route. Around that it owns the collaborators the core never touches:
//! target table loading, solver configuration, motion script translation,
//! route classification, reports, logger setup, and the command line.
//!
//! The harness does NOT evaluate routes or grow trees. It delegates to
//! `sweeproute_kernel` and `sweeproute_search`.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod config;
pub mod ensemble;
pub mod loader;
pub mod logging;
pub mod report;
pub mod translator;
