use anyhow::Result;
use log::{debug, trace};
use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use crate::{
    collector::project_walker,
    constants::{ENTRY_EXTENSIONS, ENTRY_STEMS},
    resolver::canonical,
};

/// A route together with the file that defines it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub entry: PathBuf,
}

/// Normalized routes of a routing root, in lexicographic order.
///
/// Files that normalize to the same route collapse into one entry; the
/// backing file is chosen by [`ENTRY_STEMS`] then [`ENTRY_EXTENSIONS`] order.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    routes: BTreeMap<String, PathBuf>,
}

impl RouteSet {
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn contains(&self, route: &str) -> bool {
        self.routes.contains_key(route)
    }

    pub fn entry(&self, route: &str) -> Option<&Path> {
        self.routes.get(route).map(|p| p.as_path())
    }

    pub fn first(&self) -> Option<&str> {
        self.routes.keys().next().map(|r| r.as_str())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(|r| r.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = Route> + '_ {
        self.routes.iter().map(|(path, entry)| Route { path: path.clone(), entry: entry.clone() })
    }

    /// Adds `entry` under `route`, keeping whichever file has the higher priority.
    pub fn insert(&mut self, route: String, entry: PathBuf) {
        match self.routes.get(&route) {
            Some(existing) if entry_rank(existing) <= entry_rank(&entry) => {
                trace!("Route '{}' already backed by {}", route, existing.display());
            }
            _ => {
                self.routes.insert(route, entry);
            }
        }
    }
}

fn entry_rank(path: &Path) -> (usize, usize) {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
    (
        ENTRY_STEMS.iter().position(|s| *s == stem).unwrap_or(usize::MAX),
        ENTRY_EXTENSIONS.iter().position(|e| *e == ext).unwrap_or(usize::MAX),
    )
}

pub fn is_entry_file(path: &Path) -> bool {
    let (stem, ext) = entry_rank(path);
    stem != usize::MAX && ext != usize::MAX
}

/// Turns an entry file's path relative to the routing root into a route string.
///
/// `page.tsx` becomes `/` and `blog/[slug]/page.tsx` becomes `/blog/[slug]/`.
pub fn route_for(relative_entry: &Path) -> String {
    let mut route = String::from("/");
    if let Some(dir) = relative_entry.parent() {
        for component in dir.components() {
            if let Component::Normal(segment) = component {
                route.push_str(&segment.to_string_lossy());
                route.push('/');
            }
        }
    }
    route
}

/// Walks the routing root for `page`/`layout` files and derives the route set.
pub fn enumerate_routes(routing_root: &Path) -> Result<RouteSet> {
    debug!("Enumerating routes under {}", routing_root.display());
    let mut routes = RouteSet::default();

    for res in project_walker(routing_root) {
        let dent = res?;
        let p = dent.path();
        if !dent.file_type().is_some_and(|t| t.is_file()) || !is_entry_file(p) {
            continue;
        }
        let Ok(relative) = p.strip_prefix(routing_root) else {
            continue;
        };
        let route = route_for(relative);
        trace!("Entry file {} -> route '{}'", relative.display(), route);
        routes.insert(route, canonical(p.to_path_buf()));
    }

    debug!("Found {} routes", routes.len());
    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path.canonicalize().expect("Failed to canonicalize test file")
    }

    #[test]
    fn test_route_for_root_and_nested() {
        assert_eq!(route_for(Path::new("page.tsx")), "/");
        assert_eq!(route_for(Path::new("blog/page.tsx")), "/blog/");
        assert_eq!(route_for(Path::new("blog/[slug]/layout.js")), "/blog/[slug]/");
    }

    #[test]
    fn test_is_entry_file() {
        assert!(is_entry_file(Path::new("app/page.tsx")));
        assert!(is_entry_file(Path::new("app/layout.js")));
        assert!(!is_entry_file(Path::new("app/mypage.tsx")));
        assert!(!is_entry_file(Path::new("app/page.css")));
        assert!(!is_entry_file(Path::new("app/loading.tsx")));
    }

    #[test]
    fn test_enumerate_routes_one_per_entry() {
        let temp_dir = TempDir::new().unwrap();
        let app = temp_dir.path().join("app");
        create_test_file(&app, "page.tsx", "");
        create_test_file(&app, "about/page.tsx", "");
        create_test_file(&app, "blog/[slug]/page.jsx", "");
        create_test_file(&app, "components/Header.tsx", "");

        let routes = enumerate_routes(&app).unwrap();
        assert_eq!(routes.len(), 3);
        let paths: Vec<&str> = routes.paths().collect();
        assert_eq!(paths, vec!["/", "/about/", "/blog/[slug]/"]);
    }

    #[test]
    fn test_enumerate_routes_collisions_collapse() {
        let temp_dir = TempDir::new().unwrap();
        let app = temp_dir.path().join("app");
        create_test_file(&app, "layout.tsx", "");
        let page = create_test_file(&app, "page.tsx", "");
        create_test_file(&app, "page.js", "");
        let dash_layout = create_test_file(&app, "dashboard/layout.ts", "");

        let routes = enumerate_routes(&app).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes.entry("/"), Some(page.as_path()));
        assert_eq!(routes.entry("/dashboard/"), Some(dash_layout.as_path()));
    }

    #[test]
    fn test_enumerate_routes_empty() {
        let temp_dir = TempDir::new().unwrap();
        let app = temp_dir.path().join("app");
        fs::create_dir_all(&app).unwrap();

        let routes = enumerate_routes(&app).unwrap();
        assert!(routes.is_empty());
        assert_eq!(routes.first(), None);
    }
}
