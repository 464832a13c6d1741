//! Core utilities for nextree.
//!
//! This crate provides the project-level building blocks for analyzing an
//! app-router project, including:
//! - Probing the project (framework dependency, routing root, path aliases)
//! - Enumerating routes from `page`/`layout` entry files
//! - Parsing a file's `"use client"` directive and import declarations
//! - Resolving relative and aliased import specifiers to files

mod collector;
mod config;
mod constants;
mod parser;
mod resolver;
mod routes;
mod types;

// Re-export public API
pub use collector::{collect_source_files, is_source_file, project_walker};
pub use config::{Project, check_framework, find_routing_root, read_path_aliases};
pub use constants::{
    CLIENT_DIRECTIVE, ENTRY_EXTENSIONS, ENTRY_STEMS, IGNORED_DIRS, INDEX_FILES, RESOLVE_EXTENSIONS,
    SOURCE_EXTENSIONS,
};
pub use parser::{
    has_client_directive, import_specifiers, parse_module, parse_source, source_type_for,
};
pub use resolver::{FileIndex, Resolved, ResolvedVia, Resolver, canonical, resolve_file};
pub use routes::{Route, RouteSet, enumerate_routes, is_entry_file, route_for};
pub use types::{Alias, AliasMap, Component, ComponentType, ParsedModule};
