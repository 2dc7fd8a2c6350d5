//! navtree - inspect a navigation catalog through the navigation model.
//!
//! Usage:
//!   navtree tree CATALOG                       Print the whole tree
//!   navtree resolve CATALOG PATH               Resolve an external key
//!   navtree filter CATALOG PATH PATTERN        Show a container's filtered rows
//!   navtree unique-name CATALOG BASE [-s PATH] Generate a free name
//!   navtree --help                             Show help

use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, eyre};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use navtree_catalog::Catalog;
use navtree_core::NavConfig;
use navtree_session::NavigationController;
use navtree_walker::NodePath;

#[derive(Parser)]
#[command(
    name = "navtree",
    version,
    about = "Walk, filter and address a navigation catalog",
    long_about = "navtree loads a JSON or TOML catalog into the lazily populated \
                  navigation model and runs one model operation against it."
)]
struct Cli {
    /// Model configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the tree with keys, paths and titles
    Tree {
        /// Catalog file (.json or .toml)
        catalog: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Resolve an external key such as `content/articles`
    Resolve {
        /// Catalog file (.json or .toml)
        catalog: PathBuf,

        /// Slash-separated path of keys below the root
        path: String,
    },

    /// Show the rows of a container that pass a wildcard filter
    Filter {
        /// Catalog file (.json or .toml)
        catalog: PathBuf,

        /// Path of the container (empty for the root)
        container: String,

        /// Wildcard pattern, `*` matches any run of characters
        pattern: String,
    },

    /// Generate a name that is free in a container
    UniqueName {
        /// Catalog file (.json or .toml)
        catalog: PathBuf,

        /// Base name
        base: String,

        /// Path of the container the name must be free in (defaults to the starting category)
        #[arg(short, long)]
        scope: Option<String>,

        /// Use copy naming (`Copy_of_<base>`)
        #[arg(long)]
        copy: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One printed row of the `tree` command.
#[derive(Debug, Serialize)]
struct TreeRow {
    depth: usize,
    key: String,
    path: String,
    title: String,
    container: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Tree {
            catalog,
            depth,
            format,
        } => run_tree(&config, &catalog, depth, format)?,
        Command::Resolve { catalog, path } => run_resolve(&config, &catalog, &path)?,
        Command::Filter {
            catalog,
            container,
            pattern,
        } => run_filter(&config, &catalog, &container, &pattern)?,
        Command::UniqueName {
            catalog,
            base,
            scope,
            copy,
        } => run_unique_name(&config, &catalog, &base, scope.as_deref(), copy)?,
    }

    Ok(())
}

/// Read the model configuration, falling back to defaults.
fn load_config(path: Option<&Path>) -> Result<NavConfig> {
    let Some(path) = path else {
        return Ok(NavConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: NavConfig = toml::from_str(&text).context("Invalid config file")?;
    config.validate()?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Build a session backed by a catalog file.
fn open_session(config: &NavConfig, catalog: &Path) -> Result<NavigationController> {
    let catalog = Rc::new(
        Catalog::from_path(catalog, &config.root_key)
            .with_context(|| format!("Failed to load catalog {}", catalog.display()))?,
    );
    let controller = NavigationController::new(config, Rc::clone(&catalog), catalog)?;
    Ok(controller)
}

fn run_tree(
    config: &NavConfig,
    catalog: &Path,
    depth: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let mut controller = open_session(config, catalog)?;
    let root = controller.walker().root().clone();
    let outline = controller.walker_mut().outline(&root, depth)?;

    let mut rows = Vec::with_capacity(outline.len());
    for (depth, key) in outline {
        let walker = controller.walker();
        let node = walker.tree().node(&key)?;
        let path = walker
            .build_path(&key)
            .map(|path| path.to_string())
            .unwrap_or_default();
        rows.push(TreeRow {
            depth,
            key: key.to_string(),
            path,
            title: controller.label(&key)?,
            container: node.is_container(),
            outcome: node.outcome().map(str::to_string),
        });
    }

    match format {
        OutputFormat::Text => {
            println!("{}", controller.tree().node(&root)?.title());
            for row in &rows {
                let marker = if row.container { "+" } else { "-" };
                println!(
                    "{}{} {}  [{}]",
                    "  ".repeat(row.depth),
                    marker,
                    row.title,
                    row.path
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}

fn run_resolve(config: &NavConfig, catalog: &Path, path: &str) -> Result<()> {
    let mut controller = open_session(config, catalog)?;
    let path: NodePath = path.parse()?;

    // Containers above the leaf are loaded on the way down so the leaf is registered.
    for ancestor in path.parent().map(|p| p.segments().to_vec()).unwrap_or_default() {
        if controller.tree().get(&ancestor).is_some_and(|node| node.is_container()) {
            controller.walker_mut().children(&ancestor)?;
        }
    }

    let node = controller
        .walker_mut()
        .resolve_path(&path)
        .ok_or_else(|| eyre!("No node at '{path}'"))?;
    let key = node.key().clone();
    let title = node.title().to_string();
    let outcome = node.outcome().map(str::to_string);

    let walker = controller.walker();
    let canonical = walker
        .build_path(&key)
        .ok_or_else(|| eyre!("Node {key} is detached"))?;

    println!("key:       {key}");
    println!("title:     {title}");
    println!("path:      {canonical}");
    println!("container: {}", walker.current_container());
    if let Some(outcome) = outcome {
        println!("outcome:   {outcome}");
    }

    Ok(())
}

fn run_filter(config: &NavConfig, catalog: &Path, container: &str, pattern: &str) -> Result<()> {
    let mut controller = open_session(config, catalog)?;
    let container = controller.walker_mut().load_path(&container.parse()?)?;

    let walker = controller.walker_mut();
    walker.set_filter(&container, Some(pattern))?;
    let rows = walker.filtered_nodes(&container)?;

    if rows.is_empty() {
        println!("No rows match '{pattern}'.");
        return Ok(());
    }
    for key in rows {
        let node = controller.tree().node(&key)?;
        let marker = if node.is_selected() { ">" } else { " " };
        println!("{marker} {}  [{key}]", controller.label(&key)?);
    }

    Ok(())
}

fn run_unique_name(
    config: &NavConfig,
    catalog: &Path,
    base: &str,
    scope: Option<&str>,
    copy: bool,
) -> Result<()> {
    let mut controller = open_session(config, catalog)?;
    if let Some(scope) = scope {
        let path: NodePath = scope.parse()?;
        let scope = controller
            .walker_mut()
            .load_path(&path)
            .with_context(|| format!("No container at '{path}'"))?;
        controller.set_current_category(&scope)?;
    }
    let name = controller.unique_name(base, copy, None)?;
    println!("{name}");
    Ok(())
}
