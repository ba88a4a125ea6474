//! # custody-state: Custody State Machine
//!
//! Owns the transition rules for a product's `(owner, status)` pair.
//!
//! ## Transitions
//!
//! ```text
//!             transfer            record_receipt
//! CREATED ──────────────▶ IN_TRANSIT ─────────────▶ RECEIVED
//!                           ▲    │                     │
//!                           └────┘                     │
//!                          transfer                    │
//!                           ▲                          │
//!                           └──────── transfer ────────┘
//! ```
//!
//! `transfer` is reachable from every status and always lands in
//! `IN_TRANSIT`. `record_receipt` is only valid from `IN_TRANSIT`. Both
//! require the caller to be the current owner; role membership plays no
//! part here.
//!
//! ## Design
//!
//! The status set is small and has no terminal state, so the machine is an
//! enum with a validated transition table rather than a typestate encoding.
//! Every transition is planned against an immutable borrow and committed
//! only once planning succeeds, so a rejected call leaves the record as it
//! was.

pub mod machine;
pub mod product;

pub use machine::CustodyAction;
pub use product::{Product, ProductState, TransitionRecord};
