use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::common::errors::SweepError;
use crate::common::safety;

/// On-disk usage of a path (allocated blocks, like `du`), never following links.
/// Unreadable entries count as zero.
pub fn disk_usage(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .map(|m| allocated_bytes(&m))
        .sum()
}

#[cfg(unix)]
fn allocated_bytes(metadata: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.blocks() * 512
}

#[cfg(not(unix))]
fn allocated_bytes(metadata: &std::fs::Metadata) -> u64 {
    metadata.len()
}

/// Delete a file, symlink or directory tree. Returns the bytes it occupied.
///
/// A missing path is [`SweepError::PathNotFound`]; protected paths are refused
/// before anything is touched.
pub fn remove_path(path: &Path, home: &Path) -> Result<u64, SweepError> {
    safety::ensure_removable(path, home)?;

    let metadata = std::fs::symlink_metadata(path).map_err(|e| SweepError::from_io(path, e))?;
    let size = if metadata.is_dir() {
        disk_usage(path)
    } else {
        allocated_bytes(&metadata)
    };

    let result = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        // Files and symlinks alike; a link's target is never touched
        std::fs::remove_file(path)
    };
    result.map_err(|e| SweepError::from_io(path, e))?;

    tracing::debug!(path = %path.display(), bytes = size, "removed");
    Ok(size)
}

/// Result of emptying a directory
#[derive(Debug, Default)]
pub struct ClearReport {
    pub removed: Vec<PathBuf>,
    pub bytes_freed: u64,
    pub errors: Vec<SweepError>,
}

/// Entries `<dir>/*` expands to. Like the shell glob, names starting with a
/// dot are not matched.
pub fn list_contents(dir: &Path) -> Result<Vec<PathBuf>, SweepError> {
    if !dir.is_dir() {
        return Err(SweepError::PathNotFound {
            path: dir.to_path_buf(),
        });
    }

    let pattern = format!("{}/*", glob::Pattern::escape(&dir.to_string_lossy()));
    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..Default::default()
    };
    let entries = glob::glob_with(&pattern, options).map_err(|e| SweepError::Io {
        path: dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()),
    })?;

    // Unreadable entries are dropped, as the shell would never see them
    Ok(entries.filter_map(|e| e.ok()).collect())
}

/// Remove everything [`list_contents`] finds, keeping `dir` itself
pub fn clear_contents(dir: &Path, home: &Path) -> Result<ClearReport, SweepError> {
    let mut report = ClearReport::default();
    for path in list_contents(dir)? {
        match remove_path(&path, home) {
            Ok(bytes) => {
                report.bytes_freed += bytes;
                report.removed.push(path);
            }
            Err(e) => report.errors.push(e),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_remove_tree_reports_size() {
        let home = tempfile::tempdir().unwrap();
        let target = home.path().join(".gradle/caches");
        fs::create_dir_all(target.join("modules-2")).unwrap();
        fs::write(target.join("modules-2/blob"), vec![7u8; 64 * 1024]).unwrap();

        let freed = remove_path(&target, home.path()).unwrap();
        assert!(freed >= 64 * 1024);
        assert!(!target.exists());
        assert!(home.path().join(".gradle").exists());
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let home = tempfile::tempdir().unwrap();
        let err = remove_path(&home.path().join(".expo"), home.path()).unwrap_err();
        assert!(matches!(err, SweepError::PathNotFound { .. }));
    }

    #[test]
    fn test_refuses_home() {
        let home = tempfile::tempdir().unwrap();
        let err = remove_path(home.path(), home.path()).unwrap_err();
        assert!(matches!(err, SweepError::Protected { .. }));
        assert!(home.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_target_survives() {
        let home = tempfile::tempdir().unwrap();
        let real = home.path().join("real");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("keep.txt"), "keep").unwrap();
        let link = home.path().join(".expo");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        remove_path(&link, home.path()).unwrap();
        assert!(!link.exists());
        assert!(real.join("keep.txt").exists());
    }

    #[test]
    fn test_clear_contents_keeps_hidden_and_dir() {
        let home = tempfile::tempdir().unwrap();
        let cache = home.path().join(".cache");
        fs::create_dir_all(cache.join("pip/http")).unwrap();
        fs::write(cache.join("thumb.db"), "x").unwrap();
        fs::write(cache.join(".keep"), "x").unwrap();

        let report = clear_contents(&cache, home.path()).unwrap();
        assert_eq!(report.removed.len(), 2);
        assert!(report.errors.is_empty());
        assert!(cache.is_dir());
        assert!(cache.join(".keep").exists());
        assert!(!cache.join("pip").exists());
        assert!(!cache.join("thumb.db").exists());
    }

    #[test]
    fn test_clear_contents_missing_dir() {
        let home = tempfile::tempdir().unwrap();
        let err = clear_contents(&home.path().join(".cache"), home.path()).unwrap_err();
        assert!(err.is_benign());
    }
}
