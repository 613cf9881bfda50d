use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use super::cleaner::{Cleaner, Invocation};
use super::confirm::Confirm;
use super::deps::{self, PathMatch};
use super::remover;
use super::snap;
use super::tasks::{CleanupTask, TaskAction, TaskId};
use super::volume::{self, VolumeReport};
use super::SweepContext;
use crate::cli::output;
use crate::common::errors::SweepError;
use crate::common::format;

/// How a task ended. Failures inside a task never change this; they are
/// listed in [`TaskOutcome::issues`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The action ran
    Completed,
    /// The operator answered anything but `y`
    Declined,
    /// No target path, no tool, or nothing matched
    NothingFound,
    /// Reported only, nothing touched
    DryRun,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Completed => write!(f, "completed"),
            TaskStatus::Declined => write!(f, "declined"),
            TaskStatus::NothingFound => write!(f, "nothing found"),
            TaskStatus::DryRun => write!(f, "dry run"),
        }
    }
}

/// What one task did
#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub id: TaskId,
    pub label: String,
    pub status: TaskStatus,
    /// Bytes deleted (or that would be, in a dry run); unknown for native cleaners
    pub bytes_freed: Option<u64>,
    /// External commands run, or planned in a dry run
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    /// Dependency directories found by the sweep
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<PathMatch>,
    /// Swallowed failures worth telling the operator about
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

impl TaskOutcome {
    fn new(task: &CleanupTask) -> Self {
        Self {
            id: task.id,
            label: task.label.clone(),
            status: TaskStatus::NothingFound,
            bytes_freed: None,
            commands: Vec::new(),
            matches: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn add_freed(&mut self, bytes: u64) {
        *self.bytes_freed.get_or_insert(0) += bytes;
    }
}

/// Report for a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub duration_secs: f64,
    pub dry_run: bool,
    pub volume: String,
    pub outcomes: Vec<TaskOutcome>,
    pub volume_before: Option<VolumeReport>,
    pub volume_after: Option<VolumeReport>,
}

impl RunReport {
    /// Sum of measured deletions across tasks
    pub fn total_freed(&self) -> u64 {
        self.outcomes.iter().filter_map(|o| o.bytes_freed).sum()
    }

    pub fn outcome(&self, id: TaskId) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }
}

/// Runs cleanup tasks one after another, swallowing every failure.
pub struct CleanupRunner<'a> {
    ctx: &'a SweepContext,
    cleaner: &'a dyn Cleaner,
    confirm: &'a mut dyn Confirm,
    dry_run: bool,
    show_progress: bool,
}

impl<'a> CleanupRunner<'a> {
    pub fn new(ctx: &'a SweepContext, cleaner: &'a dyn Cleaner, confirm: &'a mut dyn Confirm) -> Self {
        Self {
            ctx,
            cleaner,
            confirm,
            dry_run: false,
            show_progress: false,
        }
    }

    /// Report what would be removed without touching anything or prompting
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Print step labels and results to the terminal as the run goes
    pub fn show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Execute `tasks` in order, then measure the volume again.
    pub fn run(&mut self, tasks: &[CleanupTask]) -> RunReport {
        let started_at = Local::now();
        let clock = Instant::now();
        tracing::info!(
            home = %self.ctx.home.display(),
            tasks = tasks.len(),
            dry_run = self.dry_run,
            "cleanup run started"
        );

        let volume_before = volume::report(self.cleaner, &self.ctx.volume);
        if self.show_progress {
            output::print_banner(self.dry_run);
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks {
            if self.show_progress {
                output::print_step(task);
            }
            let outcome = self.run_task(task);
            if self.show_progress {
                output::print_task_outcome(&outcome, &self.ctx.home);
            }
            outcomes.push(outcome);
        }

        let volume_after = volume::report(self.cleaner, &self.ctx.volume);
        let report = RunReport {
            started_at,
            duration_secs: clock.elapsed().as_secs_f64(),
            dry_run: self.dry_run,
            volume: self.ctx.volume.clone(),
            outcomes,
            volume_before,
            volume_after,
        };
        tracing::info!(
            freed = report.total_freed(),
            secs = report.duration_secs,
            "cleanup run finished"
        );
        report
    }

    fn run_task(&mut self, task: &CleanupTask) -> TaskOutcome {
        tracing::info!(task = %task.id, "step started");
        let mut outcome = TaskOutcome::new(task);

        match &task.action {
            TaskAction::RemovePaths(paths) => self.remove_paths(paths, &mut outcome),
            TaskAction::ClearContents(dir) => self.clear_dir(dir, &mut outcome),
            TaskAction::Commands(invocations) => self.run_commands(invocations, &mut outcome),
            TaskAction::DependencySweep { names } => self.sweep_dependencies(names, &mut outcome),
            TaskAction::SnapRevisions => self.remove_snap_revisions(&mut outcome),
        }

        tracing::info!(task = %task.id, status = %outcome.status, "step finished");
        outcome
    }

    /// Log a swallowed failure; only non-benign ones reach the report
    fn absorb(&self, outcome: &mut TaskOutcome, err: SweepError) {
        if err.is_benign() {
            tracing::debug!(task = %outcome.id, error = %err, "nothing to do");
        } else {
            tracing::warn!(task = %outcome.id, error = %err, "step failed, continuing");
            outcome.issues.push(err.to_string());
        }
    }

    // ─── Path removal ────────────────────────────────────────────────────────

    fn remove_paths(&mut self, paths: &[PathBuf], outcome: &mut TaskOutcome) {
        for path in paths {
            if self.dry_run {
                if std::fs::symlink_metadata(path).is_ok() {
                    outcome.add_freed(remover::disk_usage(path));
                    outcome.status = TaskStatus::DryRun;
                }
                continue;
            }

            match remover::remove_path(path, &self.ctx.home) {
                Ok(bytes) => {
                    outcome.add_freed(bytes);
                    outcome.status = TaskStatus::Completed;
                }
                Err(e) => self.absorb(outcome, e),
            }
        }
    }

    fn clear_dir(&mut self, dir: &Path, outcome: &mut TaskOutcome) {
        if self.dry_run {
            match remover::list_contents(dir) {
                Ok(entries) if !entries.is_empty() => {
                    outcome.add_freed(entries.iter().map(|p| remover::disk_usage(p)).sum());
                    outcome.status = TaskStatus::DryRun;
                }
                Ok(_) => {}
                Err(e) => self.absorb(outcome, e),
            }
            return;
        }

        match remover::clear_contents(dir, &self.ctx.home) {
            Ok(report) => {
                if !report.removed.is_empty() {
                    outcome.add_freed(report.bytes_freed);
                    outcome.status = TaskStatus::Completed;
                }
                for e in report.errors {
                    self.absorb(outcome, e);
                }
            }
            Err(e) => self.absorb(outcome, e),
        }
    }

    // ─── External cleaners ───────────────────────────────────────────────────

    fn run_commands(&mut self, invocations: &[Invocation], outcome: &mut TaskOutcome) {
        for invocation in invocations {
            self.run_command(invocation, outcome);
        }
    }

    /// Run one cleaner and record it on the outcome
    fn run_command(&mut self, invocation: &Invocation, outcome: &mut TaskOutcome) {
        let line = invocation.display_with(self.ctx.use_sudo);
        if self.dry_run {
            tracing::info!(command = %line, "dry run, not executing");
            outcome.commands.push(line);
            outcome.status = TaskStatus::DryRun;
            return;
        }

        match self.cleaner.run(invocation) {
            Ok(_) => {
                outcome.commands.push(line);
                outcome.status = TaskStatus::Completed;
            }
            Err(e) => {
                // A missing tool was never run; anything else was attempted
                if !matches!(e, SweepError::ToolMissing { .. }) {
                    outcome.commands.push(line);
                    outcome.status = TaskStatus::Completed;
                }
                self.absorb(outcome, e);
            }
        }
    }

    fn remove_snap_revisions(&mut self, outcome: &mut TaskOutcome) {
        // Listing is read-only, so a dry run still shows the real plan
        let listing = match self.cleaner.run(&snap::list_all()) {
            Ok(listing) => listing,
            Err(e) => {
                self.absorb(outcome, e);
                return;
            }
        };

        let revisions = snap::parse_disabled(&listing);
        tracing::debug!(count = revisions.len(), "disabled snap revisions");
        for revision in &revisions {
            self.run_command(&revision.removal(), outcome);
        }
    }

    // ─── Dependency sweep ────────────────────────────────────────────────────

    fn sweep_dependencies(&mut self, names: &[String], outcome: &mut TaskOutcome) {
        let ctx = SweepContext {
            dependency_dirs: names.to_vec(),
            ..self.ctx.clone()
        };

        let spinner = self.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message(format!(
                "Searching {} for {} (this may take a while)...",
                format::format_path(&ctx.home, &ctx.home),
                names.join(", ")
            ));
            pb.enable_steady_tick(Duration::from_millis(120));
            pb
        });
        let matches = deps::find_dependency_dirs(&ctx.home, &ctx);
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        if matches.is_empty() {
            tracing::info!("no dependency directories found");
            return;
        }

        let total = deps::total_size(&matches);
        outcome.matches = matches.clone();

        if self.dry_run {
            if self.show_progress {
                output::print_dependency_matches(&matches, &ctx.home);
            }
            outcome.add_freed(total);
            outcome.status = TaskStatus::DryRun;
            return;
        }

        if self.show_progress {
            output::print_dependency_matches(&matches, &ctx.home);
        } else {
            output::eprint_dependency_matches(&matches, &ctx.home);
        }

        let prompt = format!(
            "Do you want to delete ALL {} found in your home folder? (y/n):",
            names.join(", ")
        );
        if !self.confirm.confirm(&prompt) {
            tracing::info!(count = matches.len(), "operator declined, dependency directories kept");
            outcome.status = TaskStatus::Declined;
            return;
        }

        outcome.status = TaskStatus::Completed;
        for found in &matches {
            match remover::remove_path(&found.path, &ctx.home) {
                Ok(bytes) => outcome.add_freed(bytes),
                Err(e) => self.absorb(outcome, e),
            }
        }
        tracing::info!(count = matches.len(), bytes = total, "dependency directories deleted");
    }
}
