use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by individual cleanup steps.
///
/// The runner never propagates these: every variant is swallowed after it has
/// been logged. `anyhow` is used at the binary boundary, these typed errors let
/// the library say exactly what went wrong inside a step.
#[derive(Debug, Error)]
pub enum SweepError {
    /// External cleaner is not installed
    #[error("'{tool}' is not installed")]
    ToolMissing { tool: String },

    /// Cache or dependency path does not exist
    #[error("path not found: '{}'", .path.display())]
    PathNotFound { path: PathBuf },

    /// Elevated operation rejected or file not writable
    #[error("permission denied: {target}. {hint}")]
    PermissionDenied { target: String, hint: String },

    /// External cleaner ran and exited unsuccessfully
    #[error("'{command}' exited with {}: {stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Path is on the never-delete list
    #[error("refusing to remove protected path '{}'", .path.display())]
    Protected { path: PathBuf },

    /// File system operation failed
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

impl SweepError {
    /// Benign errors mean "nothing to do here" and are only logged at debug.
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            SweepError::ToolMissing { .. } | SweepError::PathNotFound { .. }
        )
    }

    /// Classify an I/O error raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => SweepError::PathNotFound { path },
            std::io::ErrorKind::PermissionDenied => SweepError::PermissionDenied {
                hint: crate::common::safety::permission_hint(&path),
                target: path.display().to_string(),
            },
            _ => SweepError::Io { path, source },
        }
    }
}
