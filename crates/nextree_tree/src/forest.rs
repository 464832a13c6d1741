use anyhow::{Result, anyhow};
use log::{debug, info, trace, warn};
use nextree_core::{FileIndex, Project, Route, RouteSet, enumerate_routes};
use rayon::prelude::*;
use std::{collections::BTreeMap, thread};

use crate::{
    builder::{ParseCache, TreeBuilder},
    tree::Tree,
};

/// Import trees for every route of a project.
///
/// Routes whose tree could not be built keep their error message so the
/// route can still be listed and selected.
#[derive(Debug, Clone)]
pub struct RouteForest {
    routes: RouteSet,
    trees: BTreeMap<String, Tree>,
    failures: BTreeMap<String, String>,
    files_parsed: usize,
}

impl RouteForest {
    pub fn routes(&self) -> &RouteSet {
        &self.routes
    }

    pub fn tree(&self, route: &str) -> Option<&Tree> {
        self.trees.get(route)
    }

    pub fn failure(&self, route: &str) -> Option<&str> {
        self.failures.get(route).map(|s| s.as_str())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.failures.iter().map(|(r, e)| (r.as_str(), e.as_str()))
    }

    pub fn first_route(&self) -> Option<&str> {
        self.routes.first()
    }

    pub fn files_parsed(&self) -> usize {
        self.files_parsed
    }
}

/// Enumerates the project's routes and builds each route's tree in parallel.
pub fn build_forest(project: &Project) -> Result<RouteForest> {
    info!("Building route trees for {}", project.root.display());

    let routes = enumerate_routes(&project.routing_root)?;
    if routes.is_empty() {
        warn!("No entry files found under {}", project.routing_root.display());
        return Err(anyhow!("No entry files found under {}", project.routing_root.display()));
    }
    info!("Found {} routes", routes.len());

    let index = FileIndex::build(&project.root);
    debug!("Indexed {} source files", index.len());

    let cache = ParseCache::new();
    let builder = TreeBuilder::new(project, &index, &cache);

    let results: Vec<(Route, Result<Tree>)> = routes
        .iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|route| {
            trace!("Thread {:?} building route '{}'", thread::current().id(), route.path);
            let tree = builder.build(&route);
            (route, tree)
        })
        .collect();

    let mut trees = BTreeMap::new();
    let mut failures = BTreeMap::new();
    for (route, result) in results {
        match result {
            Ok(tree) => {
                trees.insert(route.path, tree);
            }
            Err(e) => {
                warn!("Could not build tree for route '{}': {:#}", route.path, e);
                failures.insert(route.path, format!("{:#}", e));
            }
        }
    }

    info!("Built {} route trees ({} failed)", trees.len(), failures.len());
    Ok(RouteForest { routes, trees, failures, files_parsed: cache.len() })
}
