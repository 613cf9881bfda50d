use std::path::{Component, Path};

use super::errors::SweepError;

/// Paths that must NEVER be deleted under any circumstances.
/// This is the last line against a bad config or a bad task definition.
const PROTECTED_PATHS: &[&str] = &[
    "/", "/bin", "/boot", "/dev", "/etc", "/home", "/lib", "/opt", "/proc", "/root", "/sbin",
    "/snap", "/sys", "/usr", "/var",
];

/// Paths under home that must never be deleted entirely
const PROTECTED_HOME_DIRS: &[&str] = &[
    "", // home dir itself
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Videos",
    ".config",
    ".local",
    ".ssh",
    ".gnupg",
];

/// Check if a path is protected and should NEVER be deleted
pub fn is_protected(path: &Path, home: &Path) -> bool {
    // Relative paths and `..` segments make the comparisons below meaningless
    if !path.is_absolute() || path.components().any(|c| c == Component::ParentDir) {
        return true;
    }

    if PROTECTED_PATHS.iter().any(|p| path == Path::new(p)) {
        return true;
    }

    PROTECTED_HOME_DIRS.iter().any(|dir| {
        if dir.is_empty() {
            path == home
        } else {
            path == home.join(dir)
        }
    })
}

/// Fail with [`SweepError::Protected`] when `path` is on the never-delete list.
pub fn ensure_removable(path: &Path, home: &Path) -> Result<(), SweepError> {
    if is_protected(path, home) {
        return Err(SweepError::Protected {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Get a helpful message for permission issues
pub fn permission_hint(path: &Path) -> String {
    let home_owned = dirs::home_dir().is_some_and(|home| path.starts_with(home));
    if home_owned {
        format!(
            "'{}' is inside your home but not writable; check ownership (files created by sudo are owned by root).",
            path.display()
        )
    } else {
        format!(
            "'{}' is a system path. Privileged steps run through sudo.",
            path.display()
        )
    }
}
