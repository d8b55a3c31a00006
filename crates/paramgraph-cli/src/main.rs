//! Parameter dependency-graph CLI.
//!
//! Provides the `paramgraph` binary for inspecting and editing the canvas
//! stored in a SQLite database. Every subcommand goes through the same
//! `EditorController` a graphical front end uses, so tombstones, default
//! visible options and handle validation behave identically.
//!
//! Reads configuration from:
//! - `PARAMGRAPH_DB_PATH` or `--db`: SQLite database file path (default: "paramgraph.db")
//! - `--config`: optional JSON file with editor settings
//! - `RUST_LOG`: log filter; logs go to stderr, results to stdout as JSON

mod import;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use paramgraph_core::{
    CoreError, DependencyKey, EditorConfig, NodeId, OptionId, ParameterId, Position,
};
use paramgraph_editor::{shared_viewport, EditorController, EditorError};
use paramgraph_storage::{SqliteStore, StorageError};

/// Parameter dependency-graph editor tools.
#[derive(Parser)]
#[command(name = "paramgraph", about = "Parameter dependency-graph editor tools")]
struct Cli {
    /// Path to the graph database file.
    #[arg(long, env = "PARAMGRAPH_DB_PATH", default_value = "paramgraph.db", global = true)]
    db: String,

    /// JSON file with editor settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Seed parameters and options from a JSON file.
    Import {
        /// Path to the import file.
        file: PathBuf,
    },

    #[command(flatten)]
    Edit(EditCommand),
}

/// Subcommands that run through the editor controller.
#[derive(Subcommand)]
enum EditCommand {
    /// Print the materialized nodes.
    Nodes,

    /// Print the materialized edges.
    Edges,

    /// Put a parameter on the canvas.
    Place {
        parameter: ParameterId,

        /// Canvas x coordinate (default: editor origin).
        #[arg(long, allow_negative_numbers = true)]
        x: Option<f64>,

        /// Canvas y coordinate (default: editor origin).
        #[arg(long, allow_negative_numbers = true)]
        y: Option<f64>,
    },

    /// Add another node for the parameter rendered by a node.
    Duplicate { node: NodeId },

    /// Move a node.
    Move {
        node: NodeId,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Delete a node.
    DeleteNode { node: NodeId },

    /// Create a dependency from a source handle to a target handle.
    Connect {
        /// `<nodeId>-<optionId>`
        source: String,
        /// `<nodeId>-target`
        target: String,
    },

    /// Delete the dependency identified by its triple.
    Disconnect {
        parent: ParameterId,
        option: OptionId,
        child: ParameterId,
    },

    /// Set the options a node shows.
    ShowOptions {
        node: NodeId,
        options: Vec<OptionId>,
    },
}

/// Failures surfaced to the terminal.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config in {path}: {source}")]
    Config { path: PathBuf, source: CoreError },

    #[error("failed to open database: {0}")]
    Open(StorageError),

    #[error("import failed: {0}")]
    Import(#[from] import::ImportError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CliError {
    /// Exit code: 1 = rejected command, 2 = store failure, 3 = I/O or input error.
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(_) => 1,
            CliError::Editor(err) if err.is_rejection() => 1,
            CliError::Editor(_) | CliError::Import(import::ImportError::Storage(_)) => 2,
            CliError::Io { .. }
            | CliError::Json { .. }
            | CliError::Config { .. }
            | CliError::Import(import::ImportError::Invalid { .. })
            | CliError::Open(_) => 3,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.clone(),
        source,
    })
}

fn print_json<T: Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize result: {e}\"}}"));
    println!("{json}");
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_ref())?;
    let mut store = SqliteStore::new(&cli.db).map_err(CliError::Open)?;

    let command = match cli.command {
        Commands::Import { file } => {
            let created = import::import(&mut store, read_json(&file)?)?;
            print_json(&created);
            return Ok(());
        }
        Commands::Edit(command) => command,
    };

    let editor = EditorController::new(store, config);
    editor.refresh().await;

    match command {
        EditCommand::Nodes => print_json(&editor.view().nodes),
        EditCommand::Edges => print_json(&editor.view().edges),
        EditCommand::Place { parameter, x, y } => {
            let editor = match (x, y) {
                (None, None) => editor,
                (x, y) => {
                    let origin = editor.config().default_origin;
                    let viewport = shared_viewport(editor.config().viewport);
                    if let Ok(mut vp) = viewport.write() {
                        vp.center_on(Position::new(x.unwrap_or(origin.x), y.unwrap_or(origin.y)));
                    }
                    editor.with_viewport(viewport)
                }
            };
            print_json(&editor.place_parameter(parameter).await?);
        }
        EditCommand::Duplicate { node } => {
            let parameter = editor.parameter_of(node)?;
            print_json(&editor.duplicate_node(parameter).await?);
        }
        EditCommand::Move { node, x, y } => {
            editor.node_drag_stop(node, Position::new(x, y)).await?;
            print_json(&editor.snapshot().position(node));
        }
        EditCommand::DeleteNode { node } => {
            editor.delete_node(node).await?;
            print_json(&serde_json::json!({ "deleted": node }));
        }
        EditCommand::Connect { source, target } => {
            print_json(&editor.connect(&source, &target).await?);
        }
        EditCommand::Disconnect {
            parent,
            option,
            child,
        } => {
            let key = DependencyKey {
                parent_parameter_id: parent,
                parent_option_id: option,
                child_parameter_id: child,
            };
            editor.edges_delete(vec![key]).await?;
            print_json(&serde_json::json!({ "deleted": key }));
        }
        EditCommand::ShowOptions { node, options } => {
            print_json(&editor.visible_options_changed(node, options).await?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<EditorConfig, CliError> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let config: EditorConfig = read_json(path)?;
    config.validate().map_err(|source| CliError::Config {
        path: path.clone(),
        source,
    })?;
    Ok(config)
}
