//! # Route Modules
//!
//! | Prefix           | Module       | Auth for writes          |
//! |------------------|--------------|--------------------------|
//! | `/v1/roles/*`    | [`roles`]    | caller must hold `ADMIN` |
//! | `/v1/products/*` | [`products`] | role or possession       |
//! | `/v1/events`     | [`events`]   | read-only                |
//!
//! Handlers resolve the caller, validate the body, and hand off to the
//! [`AccessGate`](custody_ledger::AccessGate). No authorization decision is
//! made here.

pub mod events;
pub mod products;
pub mod roles;
