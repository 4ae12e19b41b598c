//! Input discovery: expand files and directories into the HTML files to convert.
//!
//! Directory traversal skips common junk directories (node_modules, target, .git, etc.).

use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

/// Default file-name filter applied inside directories.
pub const DEFAULT_INCLUDE: &str = "*.{html,htm,xhtml}";

/// Directories always skipped during traversal.
const IGNORED_DIRS: &[&str] = &[
    "node_modules",
    "target",
    ".git",
    "__pycache__",
    ".venv",
    ".cache",
];

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("Invalid include pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
    #[error("Path does not exist: {}", .0.display())]
    Missing(PathBuf),
}

/// Returns `true` if this directory entry should be pruned from traversal.
pub fn is_ignored(entry: &walkdir::DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|n| IGNORED_DIRS.contains(&n))
}

fn include_matcher(pattern: &str) -> Result<GlobMatcher, WalkError> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|source| WalkError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Expand `paths` into a list of files. Files given explicitly are always kept;
/// files found inside directories must match `include` by file name.
pub fn collect_inputs(paths: &[PathBuf], include: &str) -> Result<Vec<PathBuf>, WalkError> {
    let matcher = include_matcher(include)?;
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            walk_dir(path, &matcher, &mut files);
        } else {
            return Err(WalkError::Missing(path.clone()));
        }
    }
    Ok(files)
}

fn walk_dir(root: &Path, matcher: &GlobMatcher, files: &mut Vec<PathBuf>) {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }
}
