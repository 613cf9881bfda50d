use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::remover;
use super::SweepContext;

/// A dependency directory found under the home tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathMatch {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// Find every directory named like one of `ctx.dependency_dirs` under `root`.
///
/// A match is not descended into, so nested `node_modules/x/node_modules` are
/// covered by their outermost parent. Symlinks are not followed, excluded
/// paths are pruned, unreadable entries are skipped silently. Results are
/// sorted by path.
pub fn find_dependency_dirs(root: &Path, ctx: &SweepContext) -> Vec<PathMatch> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).follow_links(false).into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::trace!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_dir() || entry.depth() == 0 {
            continue;
        }

        if ctx.is_excluded(entry.path()) {
            walker.skip_current_dir();
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if ctx.dependency_dirs.iter().any(|d| d.as_str() == name) {
            found.push(entry.path().to_path_buf());
            walker.skip_current_dir();
        }
    }

    let mut matches: Vec<PathMatch> = found
        .into_par_iter()
        .map(|path| PathMatch {
            size_bytes: remover::disk_usage(&path),
            path,
        })
        .collect();
    matches.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::debug!(root = %root.display(), count = matches.len(), "dependency scan finished");
    matches
}

/// Total size of a set of matches
pub fn total_size(matches: &[PathMatch]) -> u64 {
    matches.iter().map(|m| m.size_bytes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn project(home: &Path, rel: &str, bytes: usize) {
        let dir = home.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.js"), vec![b'x'; bytes]).unwrap();
    }

    #[test]
    fn test_finds_outermost_only() {
        let home = tempfile::tempdir().unwrap();
        project(home.path(), "a/node_modules/left-pad/node_modules/inner", 16);
        project(home.path(), "b/node_modules", 16);
        project(home.path(), "c/src", 16);

        let ctx = SweepContext::new(home.path());
        let found = find_dependency_dirs(home.path(), &ctx);
        let paths: Vec<_> = found.iter().map(|m| m.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                home.path().join("a/node_modules"),
                home.path().join("b/node_modules")
            ]
        );
    }

    #[test]
    fn test_sizes_are_measured() {
        let home = tempfile::tempdir().unwrap();
        project(home.path(), "big/node_modules", 256 * 1024);
        project(home.path(), "small/node_modules", 8 * 1024);

        let ctx = SweepContext::new(home.path());
        let found = find_dependency_dirs(home.path(), &ctx);
        assert_eq!(found.len(), 2);
        assert!(found[0].size_bytes >= 256 * 1024);
        assert!(found[0].size_bytes > found[1].size_bytes);
        assert_eq!(total_size(&found), found[0].size_bytes + found[1].size_bytes);
    }

    #[test]
    fn test_excluded_paths_pruned() {
        let home = tempfile::tempdir().unwrap();
        project(home.path(), "keep-me/node_modules", 16);
        project(home.path(), "work/node_modules", 16);

        let mut ctx = SweepContext::new(home.path());
        ctx.exclude_paths = vec!["keep-me".to_string()];
        let found = find_dependency_dirs(home.path(), &ctx);
        assert_eq!(found.len(), 1);
        assert!(found[0].path.ends_with("work/node_modules"));
    }

    #[test]
    fn test_custom_names_and_files_ignored() {
        let home = tempfile::tempdir().unwrap();
        project(home.path(), "py/.venv", 16);
        fs::write(home.path().join("node_modules"), "a file, not a dir").unwrap();

        let mut ctx = SweepContext::new(home.path());
        ctx.dependency_dirs = vec![".venv".to_string(), "node_modules".to_string()];
        let found = find_dependency_dirs(home.path(), &ctx);
        assert_eq!(found.len(), 1);
        assert!(found[0].path.ends_with("py/.venv"));
    }
}
