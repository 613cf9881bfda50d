//! The cleanup run: an ordered list of [`tasks::CleanupTask`]s executed by
//! [`runner::CleanupRunner`], with external processes behind
//! [`cleaner::Cleaner`] and the operator prompt behind [`confirm::Confirm`].

pub mod cleaner;
pub mod confirm;
pub mod deps;
pub mod remover;
pub mod runner;
pub mod snap;
pub mod tasks;
pub mod volume;

use std::path::PathBuf;

pub use cleaner::{Cleaner, Invocation, SystemCleaner};
pub use confirm::{is_affirmative, Confirm, StdinConfirm};
pub use deps::PathMatch;
pub use runner::{CleanupRunner, RunReport, TaskOutcome, TaskStatus};
pub use tasks::{CleanupTask, TaskAction, TaskId};
pub use volume::VolumeReport;

/// Everything a run needs, passed explicitly instead of read from the
/// environment mid-run.
#[derive(Debug, Clone)]
pub struct SweepContext {
    /// Root of the user's home tree; every cache path is resolved against it
    pub home: PathBuf,
    /// Device or mount point for the free-space report
    pub volume: String,
    pub log_retention_days: u32,
    pub dependency_dirs: Vec<String>,
    pub exclude_paths: Vec<String>,
    pub use_sudo: bool,
}

impl SweepContext {
    /// Context rooted at `home` with default settings.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            volume: "/".to_string(),
            log_retention_days: 7,
            dependency_dirs: vec!["node_modules".to_string()],
            exclude_paths: Vec::new(),
            use_sudo: true,
        }
    }

    /// Check if a path should be left out of the dependency scan. Only the
    /// part below `home` is matched, so the home path itself never excludes.
    pub fn is_excluded(&self, path: &std::path::Path) -> bool {
        let relative = path.strip_prefix(&self.home).unwrap_or(path);
        let path_str = relative.display().to_string();
        self.exclude_paths.iter().any(|p| path_str.contains(p.as_str()))
    }
}
