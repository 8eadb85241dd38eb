//! # mcp-registry entry point
//!
//! Parses command-line arguments, sets up tracing and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mcpmux_registry::RegistryLayout;
use mcpmux_registry_cli::build::{run_build, BuildArgs};
use mcpmux_registry_cli::conflicts::run_check_conflicts;
use mcpmux_registry_cli::inventory::{run_inventory, InventoryArgs};
use mcpmux_registry_cli::validate::{run_validate, run_validate_all, ValidateArgs};

/// McpMux registry tooling
///
/// Validates server definitions, checks the registry for id/alias conflicts,
/// and builds the bundle served to McpMux clients.
#[derive(Parser, Debug)]
#[command(name = "mcp-registry", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Registry root (directory holding servers/ and schemas/).
    #[arg(long, global = true, env = "MCP_REGISTRY_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate one or more descriptor files against the schema.
    Validate(ValidateArgs),

    /// Validate every descriptor under servers/.
    ValidateAll,

    /// Detect duplicate ids and aliases and run consistency rules.
    CheckConflicts,

    /// Build the registry bundle.
    Build(BuildArgs),

    /// List descriptors with their launcher and repository.
    Inventory(InventoryArgs),
}

fn main() -> ExitCode {
    // Before parsing, so .env can provide MCP_REGISTRY_ROOT
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let layout = resolve_layout(cli.root);
    tracing::debug!(root = %layout.root().display(), "resolved registry root");

    let result = match &cli.command {
        Commands::Validate(args) => run_validate(args, &layout),
        Commands::ValidateAll => run_validate_all(&layout),
        Commands::CheckConflicts => run_check_conflicts(&layout),
        Commands::Build(args) => run_build(args, &layout),
        Commands::Inventory(args) => run_inventory(args, &layout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// RUST_LOG takes precedence; otherwise `-v` picks the level.
/// Logs go to stderr so reports on stdout stay clean.
fn init_tracing(verbose: u8) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .init();
}

fn resolve_layout(root: Option<PathBuf>) -> RegistryLayout {
    if let Some(root) = root {
        return RegistryLayout::new(root);
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    RegistryLayout::discover(&cwd).unwrap_or_else(|| {
        tracing::warn!("Could not locate registry root; using current directory");
        RegistryLayout::new(cwd)
    })
}
