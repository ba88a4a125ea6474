//! # custody-ledger: Authorization-Gated Custody Ledger
//!
//! Holds every piece of custody state in one [`Ledger`] and exposes it
//! through one [`AccessGate`]. Nothing outside this crate can mutate a
//! ledger directly.
//!
//! ## Flow
//!
//! ```text
//!   caller + operation
//!          │
//!          ▼
//!   AccessGate ── lock ──► policy::evaluate ──► Decision
//!          │                                       │
//!          │            Allow ◄────────────────────┘
//!          ▼
//!   ProductRegistry::create  |  Product::transfer / record_receipt
//!          │
//!          ▼
//!   Journal::append ── unlock ──► new state
//! ```
//!
//! Any rejection returns before the first write.
//!
//! ## Modules
//!
//! - [`roles`]: role → members.
//! - [`products`]: sequential id space and product records.
//! - [`policy`]: the authorization predicate.
//! - [`journal`]: append-only event log.
//! - [`ledger`]: the aggregate and its snapshot format.
//! - [`genesis`]: YAML bootstrap configuration.
//! - [`gate`]: the serialized entry surface.

pub mod error;
pub mod gate;
pub mod genesis;
pub mod journal;
pub mod ledger;
pub mod policy;
pub mod products;
pub mod roles;

pub use error::{GenesisError, SnapshotError};
pub use gate::AccessGate;
pub use genesis::{Genesis, GenesisGrant};
pub use journal::{Journal, LedgerEvent, LedgerEventKind};
pub use ledger::Ledger;
pub use policy::{Decision, Operation};
pub use products::ProductRegistry;
pub use roles::RoleRegistry;
