//! # Product Subcommand
//!
//! Origination and custody transitions, plus read-only views. Product
//! state is printed as JSON with the status as its ordinal (`0` created,
//! `1` in transit, `2` received).

use anyhow::Result;
use clap::{Args, Subcommand};

use custody_core::{Identity, ProductId};

use crate::store::LedgerStore;
use crate::{finish, print_json, require_caller, EXIT_REJECTED};

/// Arguments for `custody product`.
#[derive(Args, Debug)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    /// Originate a product owned by the caller. Requires MANUFACTURER.
    Create {
        /// Free-form description, stored as given.
        #[arg(long)]
        details: String,
    },

    /// Hand a product to another custodian. Caller must be the owner.
    Transfer {
        #[arg(long)]
        id: ProductId,
        #[arg(long)]
        to: Identity,
    },

    /// Acknowledge receipt of an in-transit product. Caller must be the owner.
    Receive {
        #[arg(long)]
        id: ProductId,
    },

    /// Show a product's current state.
    Show {
        #[arg(long)]
        id: ProductId,
    },

    /// Show a product's custody events, oldest first.
    History {
        #[arg(long)]
        id: ProductId,
    },

    /// List every product.
    List,
}

/// Execute `custody product`.
pub fn run_product(
    args: &ProductArgs,
    store: &LedgerStore,
    caller: Option<&Identity>,
) -> Result<u8> {
    match &args.command {
        ProductCommand::Create { details } => {
            let caller = require_caller(caller)?;
            let outcome = store.transact(|gate| gate.create_product(caller, details.as_str()));
            finish(outcome, |state| println!("OK: created product {}", state.id))
        }
        ProductCommand::Transfer { id, to } => {
            let caller = require_caller(caller)?;
            let outcome = store.transact(|gate| gate.transfer_shipment(caller, *id, to.clone()));
            finish(outcome, |state| {
                println!("OK: product {} now held by {} ({})", state.id, state.owner, state.status)
            })
        }
        ProductCommand::Receive { id } => {
            let caller = require_caller(caller)?;
            let outcome = store.transact(|gate| gate.record_receipt(caller, *id));
            finish(outcome, |state| {
                println!("OK: product {} {} by {}", state.id, state.status, state.owner)
            })
        }
        ProductCommand::Show { id } => match store.read(|gate| gate.get_product_state(*id))? {
            Ok(state) => {
                print_json(&state)?;
                Ok(0)
            }
            Err(err) => {
                eprintln!("REJECTED [{}]: {err}", err.code());
                Ok(EXIT_REJECTED)
            }
        },
        ProductCommand::History { id } => match store.read(|gate| gate.product_history(*id))? {
            Ok(events) => {
                print_json(&events)?;
                Ok(0)
            }
            Err(err) => {
                eprintln!("REJECTED [{}]: {err}", err.code());
                Ok(EXIT_REJECTED)
            }
        },
        ProductCommand::List => {
            let products = store.read(|gate| gate.list_products())?;
            print_json(&products)?;
            Ok(0)
        }
    }
}
