//! Naming conventions shared by discovery, resolution and parsing.
//!
//! ## Source Extensions
//!
//! Only the four extensions a routing project can use for components are
//! indexed and resolved: `.ts`, `.tsx`, `.js` and `.jsx`.
//!
//! ## Entry Files
//!
//! A route is backed by a `page` or `layout` file inside the routing root.
//! When both exist for the same route, `page` wins.

/// Extensions of source files that are indexed and parsed
pub const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Extensions to try when resolving an import specifier (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Index file names to try when a specifier points at a directory
pub const INDEX_FILES: &[&str] = &["index.ts", "index.tsx", "index.js", "index.jsx"];

/// File stems that define a route, in priority order
pub const ENTRY_STEMS: &[&str] = &["page", "layout"];

/// Extensions an entry file may use, in priority order
pub const ENTRY_EXTENSIONS: &[&str] = &["tsx", "ts", "jsx", "js"];

/// Directories skipped by every walk (dependencies, build output, VCS)
pub const IGNORED_DIRS: &[&str] = &["node_modules", ".next", ".git"];

/// Compiler configuration files that may carry path aliases, in priority order
pub const CONFIG_FILES: &[&str] = &["tsconfig.json", "jsconfig.json"];

/// Directive that marks a module as a client component
pub const CLIENT_DIRECTIVE: &str = "use client";
