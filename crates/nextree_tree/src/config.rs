use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, info};
use nextree_core::Project;
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "nextree")]
pub struct Config {
    /// Root directory of the project (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Package that must be declared in package.json
    #[arg(long, default_value = "next")]
    pub framework: String,

    /// Name of the file-based routing directory
    #[arg(long, default_value = "app")]
    pub app_dir: String,

    #[clap(skip)]
    pub project: Option<Project>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            framework: "next".to_string(),
            app_dir: "app".to_string(),
            project: None,
        }
    }
}

impl Config {
    /// Resolve the root directory and probe the project
    pub fn initialize(&mut self) -> Result<()> {
        let root = match self.root.take() {
            Some(r) => {
                debug!("Using provided root directory: {:?}", r);
                r
            }
            None => {
                debug!("No root provided, using current directory");
                env::current_dir()?
            }
        };
        let root = root.canonicalize().unwrap_or(root);
        info!("Using root directory: {}", root.display());

        self.project = Some(Project::probe(&root, &self.framework, &self.app_dir)?);
        self.root = Some(root);
        Ok(())
    }

    /// Get the probed project, returning an error if not initialized
    pub fn project(&self) -> Result<&Project> {
        self.project
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
