use std::process::{Command, Stdio};

use crate::common::errors::SweepError;

/// An external command a task delegates to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Needs root: prefixed with `sudo` unless the run disables it
    pub privileged: bool,
}

impl Invocation {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            privileged: false,
        }
    }

    pub fn privileged(program: &str, args: &[&str]) -> Self {
        Self {
            privileged: true,
            ..Self::new(program, args)
        }
    }

    /// Program and argv actually spawned
    pub fn argv(&self, use_sudo: bool) -> (String, Vec<String>) {
        if self.privileged && use_sudo {
            let mut args = Vec::with_capacity(self.args.len() + 1);
            args.push(self.program.clone());
            args.extend(self.args.iter().cloned());
            ("sudo".to_string(), args)
        } else {
            (self.program.clone(), self.args.clone())
        }
    }

    /// Shell-like rendering for logs and `devsweep list`
    pub fn display_with(&self, use_sudo: bool) -> String {
        let (program, args) = self.argv(use_sudo);
        std::iter::once(program)
            .chain(args)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Capability to run external cleaners.
///
/// Returns captured stdout on success. Implementations classify failures into
/// [`SweepError`] kinds so callers can decide what is worth reporting.
pub trait Cleaner {
    fn run(&self, invocation: &Invocation) -> Result<String, SweepError>;
}

/// Runs invocations as real child processes
#[derive(Debug, Clone)]
pub struct SystemCleaner {
    use_sudo: bool,
}

impl SystemCleaner {
    pub fn new(use_sudo: bool) -> Self {
        Self { use_sudo }
    }
}

impl Cleaner for SystemCleaner {
    fn run(&self, invocation: &Invocation) -> Result<String, SweepError> {
        let (program, args) = invocation.argv(self.use_sudo);
        let line = invocation.display_with(self.use_sudo);
        tracing::debug!(command = %line, "running external cleaner");

        // sudo prompts on the terminal, so stdin stays attached
        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::inherit())
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => SweepError::ToolMissing { tool: program.clone() },
                std::io::ErrorKind::PermissionDenied => SweepError::PermissionDenied {
                    target: line.clone(),
                    hint: format!("'{}' is not executable by this user.", program),
                },
                _ => SweepError::CommandFailed {
                    command: line.clone(),
                    code: None,
                    stderr: e.to_string(),
                },
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            tracing::trace!(command = %line, %stdout, "external cleaner finished");
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        Err(classify_failure(invocation, &line, output.status.code(), stderr))
    }
}

/// Map a non-zero exit to an error kind by looking at what the tool printed
pub fn classify_failure(
    invocation: &Invocation,
    line: &str,
    code: Option<i32>,
    stderr: String,
) -> SweepError {
    let lower = stderr.to_lowercase();

    if lower.contains("command not found") {
        return SweepError::ToolMissing {
            tool: invocation.program.clone(),
        };
    }

    const DENIED_MARKERS: &[&str] = &[
        "a password is required",
        "incorrect password",
        "not in the sudoers",
        "permission denied",
        "are you root?",
    ];
    if DENIED_MARKERS.iter().any(|m| lower.contains(m)) {
        return SweepError::PermissionDenied {
            target: line.to_string(),
            hint: "Run from an account with sudo rights, or set use_sudo = false when running as root."
                .to_string(),
        };
    }

    SweepError::CommandFailed {
        command: line.to_string(),
        code,
        stderr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privileged_argv() {
        let inv = Invocation::privileged("apt-get", &["autoremove", "-y"]);
        assert_eq!(
            inv.argv(true),
            ("sudo".to_string(), vec!["apt-get".into(), "autoremove".into(), "-y".into()])
        );
        assert_eq!(
            inv.argv(false),
            ("apt-get".to_string(), vec!["autoremove".into(), "-y".into()])
        );
        assert_eq!(inv.display_with(true), "sudo apt-get autoremove -y");
    }

    #[test]
    fn test_unprivileged_never_sudo() {
        let inv = Invocation::new("npm", &["cache", "clean", "--force"]);
        assert_eq!(inv.display_with(true), "npm cache clean --force");
    }

    #[test]
    fn test_classify_sudo_command_not_found() {
        let inv = Invocation::privileged("snap", &["list", "--all"]);
        let err = classify_failure(&inv, "sudo snap list --all", Some(1), "sudo: snap: command not found".into());
        assert!(matches!(err, SweepError::ToolMissing { ref tool } if tool == "snap"));
    }

    #[test]
    fn test_classify_permission() {
        let inv = Invocation::privileged("apt-get", &["clean"]);
        let err = classify_failure(
            &inv,
            "apt-get clean",
            Some(100),
            "E: Could not open lock file /var/cache/apt/archives/lock - open (13: Permission denied)".into(),
        );
        assert!(matches!(err, SweepError::PermissionDenied { .. }));

        let err = classify_failure(&inv, "sudo apt-get clean", Some(1), "sudo: a password is required".into());
        assert!(matches!(err, SweepError::PermissionDenied { .. }));
    }

    #[test]
    fn test_classify_other_failure() {
        let inv = Invocation::new("yarn", &["cache", "clean"]);
        let err = classify_failure(&inv, "yarn cache clean", Some(2), "boom".into());
        assert!(matches!(err, SweepError::CommandFailed { code: Some(2), .. }));
    }

    #[test]
    fn test_missing_binary_is_tool_missing() {
        let cleaner = SystemCleaner::new(false);
        let err = cleaner
            .run(&Invocation::new("devsweep-no-such-tool-7f3a", &[]))
            .unwrap_err();
        assert!(matches!(err, SweepError::ToolMissing { .. }));
    }

    #[test]
    fn test_failing_command_is_command_failed() {
        let cleaner = SystemCleaner::new(false);
        let err = cleaner.run(&Invocation::new("false", &[])).unwrap_err();
        assert!(matches!(err, SweepError::CommandFailed { code: Some(1), .. }));
        assert!(!err.is_benign());
    }
}
