use anyhow::Result;
use dashmap::DashMap;
use log::{debug, trace};
use nextree_core::{
    Component, ComponentType, FileIndex, ParsedModule, Project, Resolver, Route, canonical,
    parse_module,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::tree::{NodeId, Tree};

/// Parsed files shared between route builds.
pub type ParseCache = DashMap<PathBuf, Arc<ParsedModule>>;

/// Builds one import tree per route.
///
/// Every file reached is parsed, classified and expanded once per path from
/// the root. A file imported from two branches therefore shows up twice, as
/// independent subtrees; a file that imports one of its own ancestors gets a
/// cycle marker instead of being expanded again.
pub struct TreeBuilder<'a> {
    resolver: Resolver<'a>,
    cache: &'a ParseCache,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(project: &'a Project, index: &'a FileIndex, cache: &'a ParseCache) -> Self {
        Self { resolver: Resolver::new(&project.aliases, index), cache }
    }

    /// Builds the tree for `route`.
    ///
    /// Any file on the way that cannot be read or parsed fails the whole route.
    pub fn build(&self, route: &Route) -> Result<Tree> {
        debug!("Building import tree for route '{}' from {}", route.path, route.entry.display());
        let entry = canonical(route.entry.clone());
        let mut tree = Tree::new(Component::new(route.path.clone(), entry));
        let mut work: Vec<NodeId> = vec![tree.root()];

        while let Some(id) = work.pop() {
            let path = tree.node(id).component.path.clone();
            let module = self.parse(&path)?;

            let component_type = ComponentType::from_directive(module.has_client_directive);
            trace!("Classified {} as {}", path.display(), component_type);
            tree.node_mut(id).component.component_type = Some(component_type);

            let mut expand = Vec::new();
            for specifier in &module.imports {
                let Some(resolved) = self.resolver.resolve(&path, specifier) else {
                    trace!("No file found for '{}' in {}", specifier, path.display());
                    continue;
                };

                let on_path = tree.is_on_path(id, &resolved.path);
                let child = tree.add_child(id, Component::new(specifier.clone(), resolved.path));
                if on_path {
                    debug!(
                        "Import cycle: '{}' from {} is already being expanded",
                        specifier,
                        path.display()
                    );
                    tree.node_mut(child).cycle = true;
                } else {
                    expand.push(child);
                }
            }

            // Reversed so the first import is expanded first
            work.extend(expand.into_iter().rev());
        }

        debug!("Route '{}' has {} nodes", route.path, tree.len());
        Ok(tree)
    }

    fn parse(&self, path: &Path) -> Result<Arc<ParsedModule>> {
        if let Some(module) = self.cache.get(path) {
            trace!("Cache hit for {}", path.display());
            return Ok(Arc::clone(module.value()));
        }
        let module = Arc::new(parse_module(path)?);
        self.cache.insert(path.to_path_buf(), Arc::clone(&module));
        Ok(module)
    }
}

/// Builds a single route's tree with a fresh index and cache.
pub fn build_tree(project: &Project, route: &Route) -> Result<Tree> {
    let index = FileIndex::build(&project.root);
    let cache = ParseCache::new();
    TreeBuilder::new(project, &index, &cache).build(route)
}
