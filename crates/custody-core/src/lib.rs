//! # custody-core: Foundational Types for the Custody Ledger
//!
//! Every other crate in the workspace depends on `custody-core`; it depends on
//! nothing internal. It defines the vocabulary shared by the registries, the
//! custody state machine, the HTTP service, and the CLI.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `Identity` and `ProductId`
//!    are distinct types with validated constructors. A product id cannot be
//!    passed where a caller is expected.
//!
//! 2. **Single `Role` enum.** Exhaustive `match` everywhere; adding a role forces
//!    every consumer to handle it.
//!
//! 3. **Stable status ordinals.** `ProductStatus` serializes as `0`, `1`, `2`.
//!    Observers of the wire format depend on these numbers.
//!
//! 4. **One rejection taxonomy.** Every refused operation surfaces as a
//!    [`CustodyError`] variant, whichever component detected it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `custody-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod role;
pub mod status;
pub mod temporal;

pub use error::{CustodyError, ValidationError};
pub use identity::{Identity, ProductId};
pub use role::Role;
pub use status::ProductStatus;
pub use temporal::Timestamp;
