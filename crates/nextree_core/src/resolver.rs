use log::{debug, trace};
use path_clean::clean;
use std::{
    cmp::Ordering,
    path::{Component, Path, PathBuf},
};

use crate::{
    collector::{collect_source_files, is_source_file},
    constants::{INDEX_FILES, RESOLVE_EXTENSIONS},
    types::AliasMap,
};

/// Every source file of a project, used for suffix lookups.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    files: Vec<PathBuf>,
}

impl FileIndex {
    pub fn build(root: &Path) -> Self {
        Self::from_files(collect_source_files(root))
    }

    pub fn from_files(files: Vec<PathBuf>) -> Self {
        let mut files: Vec<PathBuf> = files.into_iter().map(canonical).collect();
        files.sort();
        files.dedup();
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Finds a file anywhere in the project whose extensionless path ends with `suffix`.
    ///
    /// `./` and `../` segments of the suffix are dropped first. When several
    /// files match, the shortest path wins, then the lexicographically smallest.
    pub fn find_by_suffix(&self, suffix: &str) -> Option<&Path> {
        let wanted: Vec<&str> = Path::new(suffix)
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        if wanted.is_empty() {
            return None;
        }

        self.files
            .iter()
            .filter(|f| ends_with_segments(&f.with_extension(""), &wanted))
            .min_by(|a, b| compare_candidates(a, b))
            .map(|p| p.as_path())
    }
}

fn ends_with_segments(path: &Path, wanted: &[&str]) -> bool {
    let mut components = path.components().rev();
    for segment in wanted.iter().rev() {
        match components.next() {
            Some(Component::Normal(s)) if s == *segment => {}
            _ => return false,
        }
    }
    true
}

fn compare_candidates(a: &Path, b: &Path) -> Ordering {
    a.as_os_str().len().cmp(&b.as_os_str().len()).then_with(|| a.cmp(b))
}

/// How a specifier was turned into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedVia {
    /// Relative to the importing file's directory
    Relative,
    /// Relative specifier found by searching the whole project
    ProjectSearch,
    /// Through a path alias, identified by its pattern
    Alias(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub path: PathBuf,
    pub via: ResolvedVia,
}

/// Resolves import specifiers through a single ordered pipeline: relative
/// first, aliases only when that fails. Bare package imports are never resolved.
pub struct Resolver<'a> {
    aliases: &'a AliasMap,
    index: &'a FileIndex,
}

impl<'a> Resolver<'a> {
    pub fn new(aliases: &'a AliasMap, index: &'a FileIndex) -> Self {
        Self { aliases, index }
    }

    pub fn resolve(&self, from_file: &Path, specifier: &str) -> Option<Resolved> {
        trace!("Resolving '{}' from {}", specifier, from_file.display());

        if specifier.starts_with('.') {
            if let Some(resolved) = self.resolve_relative(from_file, specifier) {
                return Some(resolved);
            }
            trace!("Relative resolution failed for '{}'", specifier);
        }

        for (alias, remainder) in self.aliases.matching(specifier) {
            trace!("Matched alias '{}' for '{}'", alias.pattern, specifier);
            let candidate = if remainder.is_empty() {
                alias.target.clone()
            } else {
                alias.target.join(remainder)
            };
            let found = resolve_file(&candidate)
                .or_else(|| self.index.find_by_suffix(remainder).map(Path::to_path_buf));
            if let Some(path) = found {
                debug!(
                    "Resolved '{}' through alias '{}' to {}",
                    specifier,
                    alias.pattern,
                    path.display()
                );
                return Some(Resolved { path, via: ResolvedVia::Alias(alias.pattern.clone()) });
            }
        }

        None
    }

    fn resolve_relative(&self, from_file: &Path, specifier: &str) -> Option<Resolved> {
        let base = from_file.parent().unwrap_or(Path::new("."));
        if let Some(path) = resolve_file(&clean(base.join(specifier))) {
            trace!("Resolved relative import '{}' to {}", specifier, path.display());
            return Some(Resolved { path, via: ResolvedVia::Relative });
        }

        let path = self.index.find_by_suffix(specifier)?.to_path_buf();
        debug!("Resolved '{}' by project search to {}", specifier, path.display());
        Some(Resolved { path, via: ResolvedVia::ProjectSearch })
    }
}

/// Tries `p` as written, then with each extension, then as a directory with an index file.
///
/// The result is canonical so that two spellings of one file, through symlinks
/// or otherwise, compare equal.
pub fn resolve_file(p: &Path) -> Option<PathBuf> {
    if p.is_file() && is_source_file(p) {
        return Some(canonical(p.to_path_buf()));
    }

    for ext in RESOLVE_EXTENSIONS {
        let candidate = PathBuf::from(format!("{}.{}", p.display(), ext));
        if candidate.is_file() {
            return Some(canonical(candidate));
        }
    }

    if p.is_dir() {
        for index_file in INDEX_FILES {
            let candidate = p.join(index_file);
            if candidate.is_file() {
                return Some(canonical(candidate));
            }
        }
    }

    None
}

/// Resolves symlinks in `p`, keeping it unchanged when it does not exist.
pub fn canonical(p: PathBuf) -> PathBuf {
    p.canonicalize().unwrap_or(p)
}
