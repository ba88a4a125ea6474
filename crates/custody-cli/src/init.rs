//! # Init Subcommand
//!
//! Creates a ledger snapshot from a genesis YAML file, or from a bare
//! admin identity.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use custody_core::Identity;
use custody_ledger::{Genesis, Ledger};

use crate::store::LedgerStore;

/// Arguments for `custody init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Genesis YAML naming the admin and any initial role grants.
    #[arg(long, conflicts_with = "admin")]
    pub genesis: Option<PathBuf>,

    /// Admin identity, when no genesis file is used.
    #[arg(long)]
    pub admin: Option<Identity>,

    /// Replace an existing ledger.
    #[arg(long)]
    pub force: bool,
}

/// Execute `custody init`.
pub fn run_init(args: &InitArgs, store: &LedgerStore) -> Result<u8> {
    let genesis = match (&args.genesis, &args.admin) {
        (Some(path), _) => Genesis::from_path(path)
            .with_context(|| format!("loading genesis {}", path.display()))?,
        (None, Some(admin)) => Genesis::with_admin(admin.clone()),
        (None, None) => bail!("pass --genesis <FILE> or --admin <IDENTITY>"),
    };

    let ledger = Ledger::from_genesis(&genesis);
    store.create(&ledger, args.force)?;
    tracing::info!(
        path = %store.path().display(),
        admin = %genesis.admin,
        grants = genesis.grants.len(),
        "ledger initialized"
    );
    println!(
        "OK: initialized ledger at {} (admin {})",
        store.path().display(),
        genesis.admin
    );
    Ok(0)
}
