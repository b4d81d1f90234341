//! Component override inspection CLI
//!
//! Entry point for the `ovr` command-line tool.

use clap::{Args, Parser, Subcommand};
use component_overrides::config::{ConfigError, EngineConfig, DEFAULT_CONFIG_PATH};
use component_overrides::{
    logging, EditingSurface, EngineError, FileHost, FileStore, Mode, NodeId, Session,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "ovr")]
#[command(about = "Inspect component instance overrides", version)]
struct Cli {
    /// Path to project config file (default: .ovr/config.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Project root, overriding the config file
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Target {
    /// Document JSON file
    #[arg(long, short = 'd')]
    document: PathBuf,

    /// Style ref or instance ref of the node
    #[arg(long = "ref", short = 'r')]
    reference: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the frame chain of a node
    Frames {
        #[command(flatten)]
        target: Target,

        #[arg(long, short = 'm', value_enum, default_value = "element")]
        mode: Mode,
    },

    /// Print the materialized overrides addressed by a node
    Resolve {
        #[command(flatten)]
        target: Target,

        #[arg(long, short = 'm', value_enum, default_value = "element")]
        mode: Mode,
    },

    /// Print the materialized overrides of a component instance
    Materialize {
        #[command(flatten)]
        target: Target,
    },

    /// Report overridden fields and warnings for an editing surface
    Highlight {
        #[command(flatten)]
        target: Target,

        #[arg(long, short = 'm', value_enum, default_value = "element")]
        mode: Mode,

        /// Editing surface JSON file
        #[arg(long, short = 's')]
        surface: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("No node with ref {0}")]
    NodeNotFound(String),

    #[error("Node {0} has no component association in this mode")]
    NotInComponent(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliSession = Session<FileStore, FileHost>;

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };
    logging::init(&config.log_filter);

    let output = match run(cli.command, &config) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    println!("{}", output);
}

fn load_config(cli: &Cli) -> Result<EngineConfig, CliError> {
    let path = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(CliError::ConfigNotFound(path.display().to_string()))
        }
        Some(path) => path.clone(),
        None => PathBuf::from(DEFAULT_CONFIG_PATH),
    };
    let overrides = cli
        .project_root
        .as_ref()
        .map(|root| serde_json::json!({ "project_root": root.to_string_lossy() }));

    Ok(EngineConfig::load(Some(&path), overrides)?.config)
}

fn run(command: Commands, config: &EngineConfig) -> Result<String, CliError> {
    match command {
        Commands::Frames { target, mode } => {
            let (session, node) = open(&target, config)?;
            let frames = session
                .frames(node, mode)
                .ok_or(CliError::NotInComponent(target.reference))?;
            to_json(&frames)
        }
        Commands::Resolve { target, mode } => {
            let (session, node) = open(&target, config)?;
            let overrides = session
                .resolve_overrides(node, mode)
                .ok_or(CliError::NotInComponent(target.reference))?;
            to_json(&overrides)
        }
        Commands::Materialize { target } => {
            let (session, node) = open(&target, config)?;
            let record = session
                .materialize(node)
                .ok_or(CliError::NotInComponent(target.reference))?;
            to_json(&record)
        }
        Commands::Highlight {
            target,
            mode,
            surface,
        } => {
            let surface: EditingSurface = serde_json::from_str(&read(&surface)?)?;
            let (session, node) = open(&target, config)?;
            let report = session
                .highlight(node, mode, &surface)
                .ok_or(CliError::NotInComponent(target.reference))?
                .with_class(config.highlight.override_class.clone());
            to_json(&report)
        }
    }
}

fn open(target: &Target, config: &EngineConfig) -> Result<(CliSession, NodeId), CliError> {
    let store = FileStore::new(&config.project_root, config.store_root(), &config.rename_log);
    let host = FileHost::new(&target.document);
    let session = Session::open(store, host)?.with_project_root(&config.project_root);

    let node = session
        .document()
        .node_by_ref(&target.reference)
        .ok_or_else(|| CliError::NodeNotFound(target.reference.clone()))?;
    Ok((session, node))
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
