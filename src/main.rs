//! Binary entry point for docent.
//!
//! This binary provides the CLI interface for the docent dialogue engine.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use docent::config::DocentConfig;
use docent::observability;
use docent::storage::{FeatureGraph, FeatureStore, load_graph, save_graph};
use docent::{DialogueSession, Error};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Environment variable naming the config file.
const ENV_CONFIG_PATH: &str = "DOCENT_CONFIG_PATH";

/// Docent - a rule-based tour guide over a knowledge graph.
#[derive(Parser)]
#[command(name = "docent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the JSON feature graph (overrides config).
    #[arg(short, long, global = true)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Hold a conversation on stdin; an empty line moves on to a new topic.
    Chat {
        /// Emit `ID:<index>:Speak:<line>:<annotation>` replies.
        #[arg(short, long)]
        machine: bool,

        /// Write discussion counts back to the graph file on exit.
        #[arg(short, long)]
        save: bool,
    },

    /// Answer utterances in order, as one conversation.
    Ask {
        /// Utterances to answer. Use "" to move on to a new topic.
        #[arg(required = true)]
        utterances: Vec<String>,

        /// Emit machine-readable replies.
        #[arg(short, long)]
        machine: bool,
    },

    /// List the topics in the graph.
    Topics,

    /// Check a graph file and report unrecognized relation labels.
    Validate,
}

/// Main entry point.
fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(cli: Cli, config: DocentConfig) -> Result<(), Box<dyn std::error::Error>> {
    let config = match cli.graph {
        Some(path) => config.with_graph_path(path),
        None => config,
    };
    let graph_path = config.graph_path.clone().ok_or_else(|| {
        Error::InvalidInput("no graph given; pass --graph or set graph_path".to_string())
    })?;

    match cli.command {
        Commands::Chat { machine, save } => cmd_chat(&config, &graph_path, machine, save),
        Commands::Ask {
            utterances,
            machine,
        } => cmd_ask(&config, &graph_path, utterances, machine),
        Commands::Topics => cmd_topics(&graph_path),
        Commands::Validate => cmd_validate(&graph_path),
    }
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<DocentConfig, Box<dyn std::error::Error>> {
    if let Some(config_path) = path {
        return DocentConfig::load_from_file(Path::new(config_path))
            .map(DocentConfig::with_env_overrides)
            .map_err(Into::into);
    }

    if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
        if !config_path.trim().is_empty() {
            return DocentConfig::load_from_file(Path::new(&config_path))
                .map(DocentConfig::with_env_overrides)
                .map_err(Into::into);
        }
    }

    Ok(DocentConfig::load_default().with_env_overrides())
}

/// Interactive conversation.
fn cmd_chat(
    config: &DocentConfig,
    graph_path: &Path,
    machine: bool,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let graph = load_graph(graph_path)?;
    let mut session = DialogueSession::from_config(graph, config)?;

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout();

    if interactive {
        println!("Ask me about a place. An empty line moves on; Ctrl-D ends the tour.");
    }
    loop {
        if interactive {
            print!("> ");
            stdout.flush()?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        println!("{}", session.respond(line.trim_end_matches(['\r', '\n']), machine));
    }

    if save {
        let graph = session.into_store();
        save_graph(&graph, graph_path)?;
        tracing::info!(path = %graph_path.display(), "Saved discussion counts");
    }
    Ok(())
}

/// One-shot conversation from arguments.
fn cmd_ask(
    config: &DocentConfig,
    graph_path: &Path,
    utterances: Vec<String>,
    machine: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let graph = load_graph(graph_path)?;
    let mut session = DialogueSession::from_config(graph, config)?;
    for utterance in &utterances {
        println!("{}", session.respond(utterance, machine));
    }
    Ok(())
}

/// Lists topics with their graph index and discussion count.
fn cmd_topics(graph_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let graph = load_graph(graph_path)?;
    let root = graph.root();
    for (index, feature) in graph.features().iter().enumerate() {
        let marker = if index == root.index() { " (root)" } else { "" };
        println!(
            "{index:>4}  {}{marker}  discussed {}",
            feature.name, feature.discussed_amount
        );
    }
    Ok(())
}

/// Validates a graph file.
fn cmd_validate(graph_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let graph: FeatureGraph = load_graph(graph_path)?;
    println!(
        "{}: {} features, {} edges",
        graph_path.display(),
        graph.len(),
        graph.edge_count()
    );

    let unknown = graph.unknown_relations();
    if unknown.is_empty() {
        println!("All relation labels recognized.");
    } else {
        println!("Unrecognized relation labels:");
        for (feature, relation) in unknown {
            println!("  {feature}: {relation:?}");
        }
    }
    Ok(())
}
