use anyhow::{Result, anyhow};
use log::{debug, info};
use nextree_tree::{RouteForest, SerializedTree};
use serde::{Deserialize, Serialize};

use crate::html::render_page;

/// Messages the rendered page sends back to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum PanelMessage {
    ChangeRoute { route: String },
}

impl PanelMessage {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw.trim())?)
    }
}

/// The route tree view: one selected route, re-rendered wholesale on every change.
pub struct Panel<'a> {
    forest: &'a RouteForest,
    current: String,
}

impl<'a> Panel<'a> {
    /// Opens the panel on the first route.
    pub fn open(forest: &'a RouteForest) -> Result<Self> {
        let current = forest.first_route().ok_or_else(|| anyhow!("No routes to display"))?;
        info!("Opening panel on route '{}'", current);
        Ok(Self { forest, current: current.to_string() })
    }

    /// Opens the panel on `route`.
    pub fn open_at(forest: &'a RouteForest, route: &str) -> Result<Self> {
        let mut panel = Self::open(forest)?;
        panel.select(route)?;
        Ok(panel)
    }

    pub fn current_route(&self) -> &str {
        &self.current
    }

    fn select(&mut self, route: &str) -> Result<()> {
        if !self.forest.routes().contains(route) {
            return Err(anyhow!("Unknown route '{}'", route));
        }
        debug!("Selecting route '{}'", route);
        self.current = route.to_string();
        Ok(())
    }

    /// Full document for the current route.
    pub fn render(&self) -> Result<String> {
        let tree = self.forest.tree(&self.current).map(SerializedTree::from_tree);
        let error = self.forest.failure(&self.current);
        render_page(&self.current, self.forest.routes().paths(), tree.as_ref(), error)
    }

    /// Applies `message` and returns the regenerated document.
    pub fn handle(&mut self, message: &PanelMessage) -> Result<String> {
        match message {
            PanelMessage::ChangeRoute { route } => {
                info!("Changing route to '{}'", route);
                self.select(route)?;
            }
        }
        self.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextree_core::{AliasMap, Project};
    use nextree_tree::build_forest;
    use std::{
        fs,
        path::{Path, PathBuf},
    };
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn forest(root: &Path) -> RouteForest {
        create_test_file(root, "app/page.tsx", "import Header from './Header';");
        create_test_file(root, "app/Header.tsx", "'use client';");
        create_test_file(root, "app/about/page.tsx", "export default function About() {}");
        create_test_file(root, "app/broken/page.tsx", "export default function (");
        let project = Project {
            root: root.to_path_buf(),
            routing_root: root.join("app"),
            aliases: AliasMap::default(),
        };
        build_forest(&project).unwrap()
    }

    #[test]
    fn test_parse_change_route_message() {
        let message =
            PanelMessage::parse(r#"{ "command": "change-route", "route": "/about/" }"#).unwrap();
        assert_eq!(message, PanelMessage::ChangeRoute { route: "/about/".to_string() });
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(PanelMessage::parse(r#"{ "command": "refresh" }"#).is_err());
        assert!(PanelMessage::parse("not json").is_err());
    }

    #[test]
    fn test_open_on_first_route() {
        let temp_dir = TempDir::new().unwrap();
        let forest = forest(temp_dir.path());
        let panel = Panel::open(&forest).unwrap();

        assert_eq!(panel.current_route(), "/");
        let html = panel.render().unwrap();
        assert!(html.contains("./Header"));
        assert!(html.contains("<option value=\"/\" selected>"));
    }

    #[test]
    fn test_change_route_rerenders() {
        let temp_dir = TempDir::new().unwrap();
        let forest = forest(temp_dir.path());
        let mut panel = Panel::open(&forest).unwrap();

        let message = PanelMessage::ChangeRoute { route: "/about/".to_string() };
        let html = panel.handle(&message).unwrap();
        assert_eq!(panel.current_route(), "/about/");
        assert!(html.contains("<option value=\"/about/\" selected>"));
        assert!(!html.contains("./Header"));
    }

    #[test]
    fn test_change_to_failed_route_shows_error() {
        let temp_dir = TempDir::new().unwrap();
        let forest = forest(temp_dir.path());
        let mut panel = Panel::open(&forest).unwrap();

        let message = PanelMessage::ChangeRoute { route: "/broken/".to_string() };
        let html = panel.handle(&message).unwrap();
        assert!(html.contains("class=\"error\""));
    }

    #[test]
    fn test_change_to_unknown_route_keeps_selection() {
        let temp_dir = TempDir::new().unwrap();
        let forest = forest(temp_dir.path());
        let mut panel = Panel::open_at(&forest, "/about/").unwrap();

        assert!(panel.handle(&PanelMessage::ChangeRoute { route: "/nope/".to_string() }).is_err());
        assert_eq!(panel.current_route(), "/about/");
    }
}
