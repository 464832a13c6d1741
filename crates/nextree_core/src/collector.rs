use ignore::{Walk, WalkBuilder};
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::constants::{IGNORED_DIRS, SOURCE_EXTENSIONS};

/// Walks `root` without descending into dependency, build or VCS directories.
///
/// Hidden files are included and `.gitignore` rules are not applied, so the
/// result matches what is on disk rather than what is committed.
pub fn project_walker(root: &Path) -> Walk {
    WalkBuilder::new(root)
        .hidden(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .parents(false)
        .filter_entry(|dent| {
            let is_dir = dent.file_type().is_some_and(|t| t.is_dir());
            let name = dent.file_name().to_string_lossy();
            !(is_dir && IGNORED_DIRS.contains(&name.as_ref()))
        })
        .build()
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Collects every source file under `root`, sorted.
pub fn collect_source_files(root: &Path) -> Vec<PathBuf> {
    debug!("Collecting source files under {}", root.display());
    let mut files: Vec<PathBuf> = Vec::new();

    for dent in project_walker(root).filter_map(|e| e.ok()) {
        let p = dent.path();
        if !dent.file_type().is_some_and(|t| t.is_file()) || !is_source_file(p) {
            continue;
        }
        trace!("Found source file: {}", p.display());
        files.push(p.to_path_buf());
    }

    files.sort();
    debug!("Collected {} source files", files.len());
    files
}
