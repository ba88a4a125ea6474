//! # Events Subcommand
//!
//! Prints journal entries as JSON, one object per line.

use anyhow::Result;
use clap::Args;

use crate::store::LedgerStore;

/// Arguments for `custody events`.
#[derive(Args, Debug)]
pub struct EventsArgs {
    /// Only entries with a sequence number greater than this.
    #[arg(long, default_value_t = 0)]
    pub since: u64,
}

/// Execute `custody events`.
pub fn run_events(args: &EventsArgs, store: &LedgerStore) -> Result<u8> {
    for event in store.read(|gate| gate.events_since(args.since))? {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(0)
}
