//! # devsweep
//!
//! Best-effort disk-space reclamation for a Linux development workstation.
//!
//! A run walks a fixed list of cleanup steps:
//!
//! - **Package caches**: `npm cache clean --force`, `yarn cache clean`
//! - **Build and mobile-dev caches**: Gradle, Expo, Metro, and `~/.cache/*`
//! - **Dependency directories**: every `node_modules` under home, deleted only
//!   after the operator answers `y`
//! - **System leftovers**: apt cache, journald logs, disabled snap revisions
//!
//! and ends with a free-space report for a configurable volume. Missing tools,
//! missing paths and refused privileges never stop the run.

pub mod cli;
pub mod common;
pub mod sweep;

pub use sweep::{CleanupRunner, RunReport, SweepContext};
