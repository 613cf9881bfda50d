use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::cleaner::Invocation;
use super::SweepContext;

// ─── Core types ───────────────────────────────────────────────────────────────

/// Stable identifier of a cleanup step, used by `--skip`, `--only` and config
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TaskId {
    PackageCaches,
    Gradle,
    MobileDev,
    UserCache,
    DependencyDirs,
    Apt,
    Logs,
    Snap,
}

impl TaskId {
    pub const ALL: [TaskId; 8] = [
        TaskId::PackageCaches,
        TaskId::Gradle,
        TaskId::MobileDev,
        TaskId::UserCache,
        TaskId::DependencyDirs,
        TaskId::Apt,
        TaskId::Logs,
        TaskId::Snap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskId::PackageCaches => "package-caches",
            TaskId::Gradle => "gradle",
            TaskId::MobileDev => "mobile-dev",
            TaskId::UserCache => "user-cache",
            TaskId::DependencyDirs => "dependency-dirs",
            TaskId::Apt => "apt",
            TaskId::Logs => "logs",
            TaskId::Snap => "snap",
        }
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a task does when it runs
#[derive(Debug, Clone)]
pub enum TaskAction {
    /// Delete each path (file, symlink or tree)
    RemovePaths(Vec<PathBuf>),
    /// Delete every non-hidden entry inside the directory, keep the directory
    ClearContents(PathBuf),
    /// Delegate to native cleaners, in order
    Commands(Vec<Invocation>),
    /// Find directories with these names under home, confirm, delete
    DependencySweep { names: Vec<String> },
    /// Remove every disabled snap revision
    SnapRevisions,
}

/// A single step of the cleanup run
#[derive(Debug, Clone)]
pub struct CleanupTask {
    pub id: TaskId,
    pub label: String,
    pub icon: &'static str,
    pub action: TaskAction,
    pub requires_confirmation: bool,
}

impl CleanupTask {
    fn new(id: TaskId, icon: &'static str, label: &str, action: TaskAction) -> Self {
        let requires_confirmation = matches!(action, TaskAction::DependencySweep { .. });
        Self {
            id,
            label: label.to_string(),
            icon,
            action,
            requires_confirmation,
        }
    }

    /// One-line description of the action, for `devsweep list`
    pub fn describe(&self, ctx: &SweepContext) -> String {
        let home = &ctx.home;
        match &self.action {
            TaskAction::RemovePaths(paths) => format!(
                "remove {}",
                paths
                    .iter()
                    .map(|p| crate::common::format::format_path(p, home))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            TaskAction::ClearContents(dir) => {
                format!("empty {}/*", crate::common::format::format_path(dir, home))
            }
            TaskAction::Commands(invocations) => invocations
                .iter()
                .map(|i| i.display_with(ctx.use_sudo))
                .collect::<Vec<_>>()
                .join("; "),
            TaskAction::DependencySweep { names } => {
                format!("find {} under ~, confirm, delete", names.join(", "))
            }
            TaskAction::SnapRevisions => "snap remove <name> --revision=<rev> for disabled revisions".to_string(),
        }
    }
}

// ─── Default plan ─────────────────────────────────────────────────────────────

/// The full ordered task list for a workstation rooted at `ctx.home`
pub fn default_tasks(ctx: &SweepContext) -> Vec<CleanupTask> {
    let home = &ctx.home;
    let vacuum_time = format!("--vacuum-time={}d", ctx.log_retention_days);

    vec![
        CleanupTask::new(
            TaskId::PackageCaches,
            "🧩",
            "npm & yarn cache",
            TaskAction::Commands(vec![
                Invocation::new("npm", &["cache", "clean", "--force"]),
                Invocation::new("yarn", &["cache", "clean"]),
            ]),
        ),
        CleanupTask::new(
            TaskId::Gradle,
            "⚙️",
            "Gradle cache",
            TaskAction::RemovePaths(vec![
                home.join(".gradle/caches"),
                home.join(".gradle/daemon"),
                home.join(".gradle/native"),
            ]),
        ),
        CleanupTask::new(
            TaskId::MobileDev,
            "📱",
            "Expo & Metro cache",
            TaskAction::RemovePaths(vec![
                home.join(".expo"),
                home.join(".cache/expo"),
                home.join(".cache/metro"),
            ]),
        ),
        CleanupTask::new(
            TaskId::UserCache,
            "🗑️",
            "user cache",
            TaskAction::ClearContents(home.join(".cache")),
        ),
        CleanupTask::new(
            TaskId::DependencyDirs,
            "📦",
            "dependency directories",
            TaskAction::DependencySweep {
                names: ctx.dependency_dirs.clone(),
            },
        ),
        CleanupTask::new(
            TaskId::Apt,
            "📦",
            "apt cache",
            TaskAction::Commands(vec![
                Invocation::privileged("apt-get", &["clean"]),
                Invocation::privileged("apt-get", &["autoremove", "-y"]),
            ]),
        ),
        CleanupTask::new(
            TaskId::Logs,
            "📝",
            "old system logs",
            TaskAction::Commands(vec![Invocation::privileged(
                "journalctl",
                &[vacuum_time.as_str()],
            )]),
        ),
        CleanupTask::new(
            TaskId::Snap,
            "📦",
            "old snap revisions",
            TaskAction::SnapRevisions,
        ),
    ]
}

/// Apply `--only` and `--skip` (config skips are folded into `skip`)
pub fn select(tasks: Vec<CleanupTask>, only: &[TaskId], skip: &[TaskId]) -> Vec<CleanupTask> {
    tasks
        .into_iter()
        .filter(|t| only.is_empty() || only.contains(&t.id))
        .filter(|t| !skip.contains(&t.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let ctx = SweepContext::new("/home/dev");
        let ids: Vec<TaskId> = default_tasks(&ctx).iter().map(|t| t.id).collect();
        assert_eq!(ids, TaskId::ALL.to_vec());
    }

    #[test]
    fn test_only_dependency_sweep_confirms() {
        let ctx = SweepContext::new("/home/dev");
        for task in default_tasks(&ctx) {
            assert_eq!(
                task.requires_confirmation,
                task.id == TaskId::DependencyDirs,
                "{}",
                task.id
            );
        }
    }

    #[test]
    fn test_log_retention_in_command() {
        let mut ctx = SweepContext::new("/home/dev");
        ctx.log_retention_days = 3;
        let tasks = default_tasks(&ctx);
        let logs = tasks.iter().find(|t| t.id == TaskId::Logs).unwrap();
        match &logs.action {
            TaskAction::Commands(inv) => assert_eq!(inv[0].args, vec!["--vacuum-time=3d"]),
            other => panic!("unexpected action {:?}", other),
        }
    }

    #[test]
    fn test_paths_rooted_at_home() {
        let ctx = SweepContext::new("/home/dev");
        let tasks = default_tasks(&ctx);
        let gradle = tasks.iter().find(|t| t.id == TaskId::Gradle).unwrap();
        assert_eq!(
            gradle.describe(&ctx),
            "remove ~/.gradle/caches, ~/.gradle/daemon, ~/.gradle/native"
        );
    }

    #[test]
    fn test_select() {
        let ctx = SweepContext::new("/home/dev");
        let picked = select(default_tasks(&ctx), &[TaskId::Gradle, TaskId::Apt], &[TaskId::Apt]);
        let ids: Vec<TaskId> = picked.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId::Gradle]);

        let all_but_snap = select(default_tasks(&ctx), &[], &[TaskId::Snap]);
        assert_eq!(all_but_snap.len(), 7);
    }

    #[test]
    fn test_task_id_serde_matches_display() {
        for id in TaskId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id));
        }
    }
}
