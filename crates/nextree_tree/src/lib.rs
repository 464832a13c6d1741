//! Per-route import trees for app-router projects.
//!
//! Starting from each route's `page`/`layout` file, this crate follows
//! relative and aliased imports, classifies every file it parses as a client
//! or server component and records the result as one tree per route.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use nextree_tree::{Config, build_forest};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut cfg = Config {
//!     root: Some(std::path::PathBuf::from("/path/to/project")),
//!     ..Config::default()
//! };
//! cfg.initialize()?;
//! let project = cfg.project()?;
//!
//! let forest = build_forest(project)?;
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! nextree_tree::print_forest(&mut stdout, &forest, None, &project.root)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;
mod forest;
mod reporter;
mod serialize;
mod tree;

// Re-export public API
pub use builder::{ParseCache, TreeBuilder, build_tree};
pub use config::Config;
pub use forest::{RouteForest, build_forest};
pub use reporter::{print_forest, print_route_tree, print_routes};
pub use serialize::SerializedTree;
pub use tree::{NodeId, Tree, TreeNode};
