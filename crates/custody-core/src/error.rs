//! # Error Types: Rejection Taxonomy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - [`CustodyError`] is the complete set of reasons a ledger operation can be
//!   refused. Each variant carries enough context to explain the refusal to
//!   the caller without consulting the ledger again.
//! - [`ValidationError`] covers malformed input that never reaches the ledger:
//!   empty identities, unknown role names, out-of-range status ordinals.
//!
//! A rejected operation has no side effects. There is no retryable/fatal
//! split; every variant is an ordinary outcome the caller handles.

use thiserror::Error;

use crate::identity::{Identity, ProductId};
use crate::role::Role;
use crate::status::ProductStatus;

/// Reasons a ledger operation is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// The caller lacks the role the operation requires.
    #[error("account {caller} is missing role {role}")]
    Authorization {
        /// The role that was required.
        role: Role,
        /// The caller that attempted the operation.
        caller: Identity,
    },

    /// The caller is not the current custodian of the product.
    #[error("caller is not the current product owner: {caller} does not hold product {product_id}")]
    Ownership {
        /// The product the caller tried to move or acknowledge.
        product_id: ProductId,
        /// The caller that attempted the operation.
        caller: Identity,
    },

    /// The product id was never allocated.
    #[error("product {product_id} not found")]
    NotFound {
        /// The unknown product id.
        product_id: ProductId,
    },

    /// Receipt was attempted while the product is not in transit.
    #[error("product {product_id} is {status}; receipt requires IN_TRANSIT")]
    InvalidState {
        /// The product whose status blocked the operation.
        product_id: ProductId,
        /// The status at the time of the attempt.
        status: ProductStatus,
    },
}

impl CustodyError {
    /// Machine-readable code for this rejection, stable across releases.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authorization { .. } => "AUTHORIZATION_ERROR",
            Self::Ownership { .. } => "OWNERSHIP_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidState { .. } => "INVALID_STATE",
        }
    }
}

/// Malformed input rejected before it reaches the ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identity string is empty.
    #[error("invalid identity: must be non-empty")]
    EmptyIdentity,

    /// Identity string exceeds the maximum length.
    #[error("invalid identity: {len} bytes exceeds the {max}-byte limit")]
    IdentityTooLong {
        /// Length of the rejected identity in bytes.
        len: usize,
        /// The maximum permitted length.
        max: usize,
    },

    /// Identity contains whitespace or control characters.
    #[error("invalid identity: \"{0}\" contains whitespace or control characters")]
    IdentityCharacters(String),

    /// Product id is zero or not a positive integer.
    #[error("invalid product id: \"{0}\" (expected a positive integer)")]
    InvalidProductId(String),

    /// Role name does not match any known role.
    #[error("unknown role: \"{0}\" (expected MANUFACTURER, DISTRIBUTOR, RETAILER, or ADMIN)")]
    UnknownRole(String),

    /// Status ordinal is outside 0..=2.
    #[error("unknown product status ordinal: {0}")]
    UnknownStatus(u64),

    /// Timestamp string is not valid UTC RFC 3339.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
