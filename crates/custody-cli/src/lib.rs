//! # custody-cli: Command-Line Client for a Local Custody Ledger
//!
//! Operates on a JSON snapshot of a ledger. Every mutating command loads
//! the snapshot, runs one operation through the access gate as the
//! identity given by `--as`, and writes the snapshot back only if the
//! operation committed.
//!
//! ## Subcommands
//!
//! - `custody init`: create a ledger from a genesis file or an admin identity.
//! - `custody role grant|revoke|check`: role administration and queries.
//! - `custody product create|transfer|receive|show|history|list`: custody.
//! - `custody events`: the ledger journal.
//!
//! ## Exit Codes
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | success                                   |
//! | 1    | usage, I/O, or corrupt-snapshot failure   |
//! | 2    | the ledger rejected the operation         |

pub mod events;
pub mod init;
pub mod product;
pub mod role;
pub mod store;

use anyhow::{anyhow, Result};

use custody_core::Identity;

use crate::store::TransactError;

/// Exit code for an operation the ledger refused.
pub const EXIT_REJECTED: u8 = 2;

/// The identity a mutating command acts as.
pub fn require_caller(caller: Option<&Identity>) -> Result<&Identity> {
    caller.ok_or_else(|| anyhow!("this command changes the ledger; pass --as <IDENTITY>"))
}

/// Turn a transaction outcome into an exit code. Rejections are reported
/// on stderr and exit with [`EXIT_REJECTED`]; store failures propagate.
pub fn finish<T>(outcome: Result<T, TransactError>, on_ok: impl FnOnce(T)) -> Result<u8> {
    match outcome {
        Ok(value) => {
            on_ok(value);
            Ok(0)
        }
        Err(TransactError::Rejected(err)) => {
            eprintln!("REJECTED [{}]: {err}", err.code());
            Ok(EXIT_REJECTED)
        }
        Err(TransactError::Store(err)) => Err(err.into()),
    }
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
