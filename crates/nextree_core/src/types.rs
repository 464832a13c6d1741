use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Client,
    Server,
}

impl ComponentType {
    pub fn from_directive(has_client_directive: bool) -> Self {
        if has_client_directive { ComponentType::Client } else { ComponentType::Server }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Client => "client",
            ComponentType::Server => "server",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source file encountered while walking a route's imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Import specifier as written, or the route string for a tree root
    pub name: String,
    pub path: PathBuf,
    pub component_type: Option<ComponentType>,
}

impl Component {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into(), component_type: None }
    }
}

/// What the tree builder needs from a parsed file.
#[derive(Debug, Clone, Default)]
pub struct ParsedModule {
    pub has_client_directive: bool,
    /// Runtime import specifiers in document order
    pub imports: Vec<String>,
}

/// A single `compilerOptions.paths` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Pattern as written in the configuration, e.g. `@/*`
    pub pattern: String,
    /// Pattern with the wildcard removed, e.g. `@/`
    pub prefix: String,
    /// Absolute directory (or file) the prefix stands for
    pub target: PathBuf,
}

impl Alias {
    pub fn new(pattern: &str, target: PathBuf) -> Self {
        Self { pattern: pattern.to_string(), prefix: pattern.replacen('*', "", 1), target }
    }

    fn is_wildcard(&self) -> bool {
        self.pattern.contains('*')
    }

    /// Returns the part of `specifier` that follows the alias prefix, if the alias applies.
    pub fn strip<'s>(&self, specifier: &'s str) -> Option<&'s str> {
        let rest = specifier.strip_prefix(self.prefix.as_str())?;
        if self.is_wildcard() {
            return Some(rest);
        }
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }
}

/// Path aliases ordered longest prefix first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    aliases: Vec<Alias>,
}

impl AliasMap {
    pub fn new(mut aliases: Vec<Alias>) -> Self {
        aliases.sort_by(|a, b| {
            b.prefix.len().cmp(&a.prefix.len()).then_with(|| a.prefix.cmp(&b.prefix))
        });
        aliases.dedup_by(|a, b| a.pattern == b.pattern);
        Self { aliases }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn get(&self, pattern: &str) -> Option<&Path> {
        self.aliases.iter().find(|a| a.pattern == pattern).map(|a| a.target.as_path())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Alias> {
        self.aliases.iter()
    }

    /// Every alias that applies to `specifier`, paired with the remainder after its prefix.
    pub fn matching<'s>(
        &'s self,
        specifier: &'s str,
    ) -> impl Iterator<Item = (&'s Alias, &'s str)> {
        self.aliases.iter().filter_map(move |a| a.strip(specifier).map(|rest| (a, rest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_alias_strip() {
        let alias = Alias::new("@/*", PathBuf::from("/project/src"));
        assert_eq!(alias.prefix, "@/");
        assert_eq!(alias.strip("@/components/Button"), Some("components/Button"));
        assert_eq!(alias.strip("react"), None);
    }

    #[test]
    fn test_exact_alias_requires_boundary() {
        let alias = Alias::new("@utils", PathBuf::from("/project/src/utils"));
        assert_eq!(alias.strip("@utils"), Some(""));
        assert_eq!(alias.strip("@utils/format"), Some("format"));
        assert_eq!(alias.strip("@utilsx"), None);
    }

    #[test]
    fn test_alias_map_prefers_longest_prefix() {
        let map = AliasMap::new(vec![
            Alias::new("@/*", PathBuf::from("/p/src")),
            Alias::new("@/components/*", PathBuf::from("/p/ui")),
        ]);
        let matched: Vec<&str> =
            map.matching("@/components/Card").map(|(a, _)| a.pattern.as_str()).collect();
        assert_eq!(matched, vec!["@/components/*", "@/*"]);
    }

    #[test]
    fn test_component_type_from_directive() {
        assert_eq!(ComponentType::from_directive(true), ComponentType::Client);
        assert_eq!(ComponentType::from_directive(false), ComponentType::Server);
        assert_eq!(ComponentType::Client.to_string(), "client");
    }
}
