use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::{debug, info, warn};
use nextree_panel::{Panel, PanelMessage};
use nextree_tree::{Config, RouteForest, SerializedTree};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "nextree")]
#[command(about = "Client/server component trees for app-router projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List every route and the file that defines it
    Routes(Config),
    /// Print the import tree of one or all routes
    Tree(TreeArgs),
    /// Write the panel document for a route to a file
    Html(HtmlArgs),
    /// Keep a panel document up to date from change-route messages on stdin
    Panel(PanelArgs),
}

#[derive(Debug, Args)]
struct TreeArgs {
    #[command(flatten)]
    config: Config,

    /// Only print this route
    #[arg(long)]
    route: Option<String>,

    /// Print serialized trees as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct HtmlArgs {
    #[command(flatten)]
    config: Config,

    /// Route to render (defaults to the first route)
    #[arg(long)]
    route: Option<String>,

    /// File to write the document to
    #[arg(long, default_value = "nextree.html")]
    output: PathBuf,
}

#[derive(Debug, Args)]
struct PanelArgs {
    #[command(flatten)]
    config: Config,

    /// File the document is written to after every message
    #[arg(long, default_value = "nextree.html")]
    output: PathBuf,
}

fn load(mut cfg: Config) -> Result<(Config, RouteForest)> {
    cfg.initialize()?;
    let forest = nextree_tree::build_forest(cfg.project()?)?;
    debug!("Parsed {} files", forest.files_parsed());
    Ok((cfg, forest))
}

fn open_panel<'a>(forest: &'a RouteForest, route: Option<&str>) -> Result<Panel<'a>> {
    match route {
        Some(route) => Panel::open_at(forest, route),
        None => Panel::open(forest),
    }
}

fn write_document(path: &Path, html: &str) -> Result<()> {
    fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Routes(cfg) => {
            let (_, forest) = load(cfg)?;
            nextree_tree::print_routes(&mut stdout, &forest)?;
        }
        Commands::Tree(args) => {
            info!("Building route trees (using {} threads)", rayon::current_num_threads());
            let (cfg, forest) = load(args.config)?;
            let route = args.route.as_deref();
            if let Some(r) = route
                && !forest.routes().contains(r)
            {
                return Err(anyhow!("Unknown route '{}'", r));
            }

            if args.json {
                let trees: BTreeMap<&str, SerializedTree> = forest
                    .routes()
                    .paths()
                    .filter(|p| route.is_none_or(|r| r == *p))
                    .filter_map(|p| forest.tree(p).map(|t| (p, SerializedTree::from_tree(t))))
                    .collect();
                serde_json::to_writer_pretty(&mut stdout, &trees)?;
                writeln!(stdout)?;
            } else {
                nextree_tree::print_forest(&mut stdout, &forest, route, &cfg.project()?.root)?;
                writeln!(
                    stdout,
                    "{} Finished in {}ms on {} files.",
                    "●".bright_blue(),
                    start.elapsed().as_millis().to_string().cyan(),
                    forest.files_parsed().to_string().cyan()
                )?;
            }
            stdout.flush()?;

            let failed = forest.failures().filter(|(r, _)| route.is_none_or(|x| x == *r)).count();
            if failed > 0 {
                // Non-zero exit so scripts notice broken routes
                std::process::exit(1);
            }
        }
        Commands::Html(args) => {
            let (_, forest) = load(args.config)?;
            let panel = open_panel(&forest, args.route.as_deref())?;
            write_document(&args.output, &panel.render()?)?;
            writeln!(
                stdout,
                "{} Wrote {} for route {}",
                "✓".green().bold(),
                args.output.display(),
                panel.current_route().bold()
            )?;
            stdout.flush()?;
        }
        Commands::Panel(args) => {
            let (_, forest) = load(args.config)?;
            let mut panel = open_panel(&forest, None)?;
            write_document(&args.output, &panel.render()?)?;
            writeln!(
                stdout,
                "{} Panel open at {} on route {}",
                "●".bright_blue(),
                args.output.display(),
                panel.current_route().bold()
            )?;
            stdout.flush()?;

            for line in std::io::stdin().lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let message = match PanelMessage::parse(&line) {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("Ignoring malformed panel message {:?}: {}", line, e);
                        continue;
                    }
                };
                match panel.handle(&message) {
                    Ok(html) => {
                        write_document(&args.output, &html)?;
                        let route = panel.current_route();
                        writeln!(stdout, "{} route {}", "↻".cyan(), route.bold())?;
                    }
                    Err(e) => {
                        writeln!(stdout, "{} {}", "✗".red().bold(), e)?;
                    }
                }
                stdout.flush()?;
            }
        }
    }

    Ok(())
}
