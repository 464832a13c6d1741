use anyhow::{Context, Result, anyhow};
use log::{debug, info, trace, warn};
use path_clean::clean;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    collector::project_walker,
    constants::CONFIG_FILES,
    types::{Alias, AliasMap},
};

/// Everything the analysis needs to know about a project, probed once up front.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub routing_root: PathBuf,
    pub aliases: AliasMap,
}

impl Project {
    /// Verifies the framework dependency, then locates the routing root and path aliases.
    pub fn probe(root: &Path, framework: &str, routing_dir: &str) -> Result<Self> {
        info!("Probing project at {}", root.display());
        check_framework(root, framework)?;

        let routing_root = find_routing_root(root, routing_dir)?;
        info!("Using routing root: {}", routing_root.display());

        let aliases = read_path_aliases(root);
        debug!("Found {} path aliases", aliases.len());

        Ok(Self { root: root.to_path_buf(), routing_root, aliases })
    }
}

/// Fails unless `package.json` declares `package` as a dependency or dev dependency.
pub fn check_framework(root: &Path, package: &str) -> Result<()> {
    let manifest = root.join("package.json");
    debug!("Reading manifest at {}", manifest.display());

    let json = fs::read_to_string(&manifest)
        .ok()
        .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
        .ok_or_else(|| anyhow!("Could not find package.json in {}", root.display()))?;

    let declared = ["dependencies", "devDependencies"]
        .iter()
        .filter_map(|group| json.get(group))
        .any(|deps| deps.get(package).is_some_and(|v| !v.is_null()));

    if !declared {
        return Err(anyhow!("Not a {} project: {} is not a dependency", package, package));
    }
    trace!("Found '{}' in {}", package, manifest.display());
    Ok(())
}

/// Finds the first directory called `dir_name`, preferring the shallowest match.
pub fn find_routing_root(root: &Path, dir_name: &str) -> Result<PathBuf> {
    debug!("Searching for '{}' directory under {}", dir_name, root.display());
    let mut candidates: Vec<PathBuf> = project_walker(root)
        .filter_map(|e| e.ok())
        .filter(|dent| dent.depth() > 0 && dent.file_type().is_some_and(|t| t.is_dir()))
        .filter(|dent| dent.file_name() == dir_name)
        .map(|dent| dent.into_path())
        .collect();

    sort_shallowest_first(&mut candidates);
    trace!("Routing root candidates: {:?}", candidates);

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Could not find an '{}' directory in {}", dir_name, root.display()))
}

/// Reads `compilerOptions.paths` from the project's compiler configuration.
///
/// Any failure to find or read the configuration yields an empty map.
pub fn read_path_aliases(root: &Path) -> AliasMap {
    let Some(config_path) = find_compiler_config(root) else {
        debug!("No compiler configuration found under {}", root.display());
        return AliasMap::default();
    };
    info!("Using compiler configuration: {}", config_path.display());

    match parse_path_aliases(&config_path) {
        Ok(aliases) => aliases,
        Err(e) => {
            warn!("Could not read {}: {:#}", config_path.display(), e);
            AliasMap::default()
        }
    }
}

fn find_compiler_config(root: &Path) -> Option<PathBuf> {
    for name in CONFIG_FILES {
        let mut found: Vec<PathBuf> = project_walker(root)
            .filter_map(|e| e.ok())
            .filter(|dent| dent.file_type().is_some_and(|t| t.is_file()))
            .filter(|dent| dent.file_name() == *name)
            .map(|dent| dent.into_path())
            .collect();
        sort_shallowest_first(&mut found);
        if let Some(first) = found.into_iter().next() {
            return Some(first);
        }
    }
    None
}

fn parse_path_aliases(config_path: &Path) -> Result<AliasMap> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let json = parse_config_value(&content)
        .ok_or_else(|| anyhow!("Failed to parse {}", config_path.display()))?;

    let Some(compiler_options) = json.get("compilerOptions") else {
        return Ok(AliasMap::default());
    };
    let base_url = compiler_options.get("baseUrl").and_then(|b| b.as_str()).unwrap_or(".");
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let base_path = config_dir.join(base_url);

    let mut aliases = Vec::new();
    if let Some(paths_obj) = compiler_options.get("paths").and_then(|p| p.as_object()) {
        for (pattern, targets) in paths_obj {
            // Only the first target of each pattern is used
            let Some(first) = targets.as_array().and_then(|t| t.first()).and_then(|t| t.as_str())
            else {
                trace!("Skipping alias '{}' without a string target", pattern);
                continue;
            };
            let target = clean(base_path.join(first.replacen('*', "", 1)));
            trace!("Found path alias: '{}' -> {}", pattern, target.display());
            aliases.push(Alias::new(pattern, target));
        }
    }

    Ok(AliasMap::new(aliases))
}

fn sort_shallowest_first(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        a.components().count().cmp(&b.components().count()).then_with(|| a.cmp(b))
    });
}

/// Parses a compiler configuration, which may carry comments and trailing commas.
fn parse_config_value(content: &str) -> Option<serde_json::Value> {
    if let Ok(v) = serde_json::from_str(content) {
        return Some(v);
    }
    trace!("Not plain JSON, retrying as JSON5");
    json_five::from_str::<serde_json::Value>(content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_check_framework_dependency() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "package.json", r#"{ "dependencies": { "next": "14.2.0" } }"#);

        assert!(check_framework(root, "next").is_ok());
    }

    #[test]
    fn test_check_framework_dev_dependency() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "package.json", r#"{ "devDependencies": { "next": "^14" } }"#);

        assert!(check_framework(root, "next").is_ok());
    }

    #[test]
    fn test_check_framework_missing_dependency() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "package.json", r#"{ "dependencies": { "react": "18" } }"#);

        let err = check_framework(root, "next").unwrap_err();
        assert!(err.to_string().contains("Not a next project"));
    }

    #[test]
    fn test_check_framework_missing_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let err = check_framework(temp_dir.path(), "next").unwrap_err();
        assert!(err.to_string().contains("Could not find package.json"));
    }

    #[test]
    fn test_check_framework_malformed_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "package.json", "{ not json");

        assert!(check_framework(root, "next").is_err());
    }

    #[test]
    fn test_find_routing_root_prefers_shallowest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/app/page.tsx", "");
        create_test_file(root, "src/features/app/x.ts", "");
        create_test_file(root, "node_modules/next/app/page.js", "");

        let app = find_routing_root(root, "app").unwrap();
        assert_eq!(app, root.join("src").join("app"));
    }

    #[test]
    fn test_find_routing_root_missing() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "pages/index.tsx", "");

        assert!(find_routing_root(temp_dir.path(), "app").is_err());
    }

    #[test]
    fn test_read_path_aliases_with_base_url() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "tsconfig.json",
            r#"
{
  "compilerOptions": {
    "baseUrl": "src",
    "paths": {
      "@/*": ["./*"],
      "@ui/*": ["components/ui/*", "fallback/*"]
    }
  }
}
"#,
        );

        let aliases = read_path_aliases(root);
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases.get("@/*"), Some(root.join("src").as_path()));
        assert_eq!(aliases.get("@ui/*"), Some(root.join("src/components/ui").as_path()));
    }

    #[test]
    fn test_read_path_aliases_with_comments_and_trailing_commas() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "tsconfig.json",
            r#"
{
  // Next.js defaults
  "compilerOptions": {
    /* block comment */
    "baseUrl": ".",
    "paths": {
      "@/*": ["./src/*"], // trailing comma below
    },
  },
  "include": ["**/*.ts", "https://example.com/x"],
}
"#,
        );

        let aliases = read_path_aliases(root);
        assert_eq!(aliases.len(), 1);
        assert_eq!(aliases.get("@/*"), Some(root.join("src").as_path()));
    }

    #[test]
    fn test_read_path_aliases_falls_back_to_jsconfig() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "jsconfig.json",
            r#"{ "compilerOptions": { "paths": { "~/*": ["lib/*"] } } }"#,
        );

        let aliases = read_path_aliases(root);
        assert_eq!(aliases.get("~/*"), Some(root.join("lib").as_path()));
    }

    #[test]
    fn test_read_path_aliases_unreadable_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "tsconfig.json", "{ this is not json");

        assert!(read_path_aliases(root).is_empty());
    }

    #[test]
    fn test_read_path_aliases_missing_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(read_path_aliases(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_parse_config_value_keeps_comment_like_strings() {
        let json = parse_config_value(
            r#"{
  // line comment
  "url": "http://x//y",
  "glob": "a/*b*/c", /* block */
}"#,
        )
        .unwrap();
        assert_eq!(json["url"], "http://x//y");
        assert_eq!(json["glob"], "a/*b*/c");
    }

    #[test]
    fn test_parse_config_value_plain_json_and_garbage() {
        let json = parse_config_value(r#"{"compilerOptions": {"baseUrl": "."}}"#).unwrap();
        assert_eq!(json["compilerOptions"]["baseUrl"], ".");
        assert!(parse_config_value("{ this is not json").is_none());
    }

    #[test]
    fn test_probe_project() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "package.json", r#"{ "dependencies": { "next": "14" } }"#);
        create_test_file(
            root,
            "tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "@/*": ["./*"] } } }"#,
        );
        create_test_file(root, "app/page.tsx", "");

        let project = Project::probe(root, "next", "app").unwrap();
        assert_eq!(project.routing_root, root.join("app"));
        assert_eq!(project.aliases.len(), 1);
    }
}
