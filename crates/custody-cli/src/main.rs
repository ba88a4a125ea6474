//! # custody CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use custody_cli::events::{run_events, EventsArgs};
use custody_cli::init::{run_init, InitArgs};
use custody_cli::product::{run_product, ProductArgs};
use custody_cli::role::{run_role, RoleArgs};
use custody_cli::store::LedgerStore;
use custody_core::Identity;

/// Custody ledger CLI
///
/// Tracks goods through a custody chain in a local ledger snapshot.
/// Manufacturers originate products; whoever holds a product may hand it
/// on or acknowledge its receipt.
#[derive(Parser, Debug)]
#[command(name = "custody", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the ledger snapshot.
    #[arg(long, global = true, default_value = ".custody/ledger.json")]
    ledger: PathBuf,

    /// Identity to act as for commands that change the ledger.
    #[arg(long = "as", value_name = "IDENTITY", global = true)]
    caller: Option<Identity>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a ledger from a genesis file or an admin identity.
    Init(InitArgs),

    /// Grant, revoke, and query roles.
    Role(RoleArgs),

    /// Originate, transfer, receive, and inspect products.
    Product(ProductArgs),

    /// Print journal entries.
    Events(EventsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store = LedgerStore::new(cli.ledger.clone());
    tracing::debug!(ledger = %store.path().display(), "using ledger");

    let caller = cli.caller.as_ref();
    let result = match &cli.command {
        Commands::Init(args) => run_init(args, &store),
        Commands::Role(args) => run_role(args, &store, caller),
        Commands::Product(args) => run_product(args, &store, caller),
        Commands::Events(args) => run_events(args, &store),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
