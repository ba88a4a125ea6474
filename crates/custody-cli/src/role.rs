//! # Role Subcommand
//!
//! - `grant`: add an account to a role (admin only).
//! - `revoke`: remove an account from a role (admin only).
//! - `check`: whether an account holds a role, or every role it holds.

use anyhow::Result;
use clap::{Args, Subcommand};

use custody_core::{Identity, Role};

use crate::store::LedgerStore;
use crate::{finish, require_caller};

/// Arguments for `custody role`.
#[derive(Args, Debug)]
pub struct RoleArgs {
    #[command(subcommand)]
    pub command: RoleCommand,
}

#[derive(Subcommand, Debug)]
pub enum RoleCommand {
    /// Grant a role. Requires --as an ADMIN.
    Grant {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        account: Identity,
    },

    /// Revoke a role. Requires --as an ADMIN. Custody already held is kept.
    Revoke {
        #[arg(long)]
        role: Role,
        #[arg(long)]
        account: Identity,
    },

    /// Query membership. Without --role, lists every role the account holds.
    Check {
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        account: Identity,
    },
}

/// Execute `custody role`.
pub fn run_role(args: &RoleArgs, store: &LedgerStore, caller: Option<&Identity>) -> Result<u8> {
    match &args.command {
        RoleCommand::Grant { role, account } => {
            let caller = require_caller(caller)?;
            let outcome = store.transact(|gate| gate.grant_role(caller, *role, account.clone()));
            finish(outcome, |changed| report(changed, "granted", *role, account))
        }
        RoleCommand::Revoke { role, account } => {
            let caller = require_caller(caller)?;
            let outcome = store.transact(|gate| gate.revoke_role(caller, *role, account));
            finish(outcome, |changed| report(changed, "revoked", *role, account))
        }
        RoleCommand::Check {
            role: Some(role),
            account,
        } => {
            let held = store.read(|gate| gate.has_role(*role, account))?;
            println!("{held}");
            Ok(0)
        }
        RoleCommand::Check {
            role: None,
            account,
        } => {
            let roles = store.read(|gate| gate.roles_of(account))?;
            for role in roles {
                println!("{role}");
            }
            Ok(0)
        }
    }
}

fn report(changed: bool, verb: &str, role: Role, account: &Identity) {
    if changed {
        println!("OK: {verb} {role} for {account}");
    } else {
        println!("OK: {role} for {account} unchanged");
    }
}
