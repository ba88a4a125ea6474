//! # Access Policy
//!
//! The authorization predicate evaluated before every mutating operation.
//! Origination and role administration are gated by role membership;
//! custody transitions are gated by possession alone.
//!
//! | Operation           | Allowed when                        |
//! |---------------------|-------------------------------------|
//! | `GrantRole`         | caller holds `ADMIN`                |
//! | `RevokeRole`        | caller holds `ADMIN`                |
//! | `CreateProduct`     | caller holds `MANUFACTURER`         |
//! | `TransferShipment`  | caller is the product's owner       |
//! | `RecordReceipt`     | caller is the product's owner       |
//!
//! The `IN_TRANSIT` precondition on receipt is a property of the record,
//! not of the caller, and is enforced by the state machine.

use std::fmt;

use custody_core::{CustodyError, Identity, ProductId, Role};

use crate::ledger::Ledger;

/// A mutating operation, reduced to what authorization depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GrantRole { role: Role },
    RevokeRole { role: Role },
    CreateProduct,
    TransferShipment { product_id: ProductId },
    RecordReceipt { product_id: ProductId },
}

impl Operation {
    /// The role the caller must hold, for role-gated operations.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Self::GrantRole { .. } | Self::RevokeRole { .. } => Some(Role::Admin),
            Self::CreateProduct => Some(Role::Manufacturer),
            Self::TransferShipment { .. } | Self::RecordReceipt { .. } => None,
        }
    }

    /// The product whose owner must be the caller, for custody operations.
    pub fn custody_target(&self) -> Option<ProductId> {
        match self {
            Self::TransferShipment { product_id } | Self::RecordReceipt { product_id } => {
                Some(*product_id)
            }
            Self::GrantRole { .. } | Self::RevokeRole { .. } | Self::CreateProduct => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GrantRole { .. } => "grantRole",
            Self::RevokeRole { .. } => "revokeRole",
            Self::CreateProduct => "createProduct",
            Self::TransferShipment { .. } => "transferShipment",
            Self::RecordReceipt { .. } => "recordReceipt",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of evaluating the policy for one caller and operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// The caller lacks the role the operation requires.
    MissingRole { role: Role, caller: Identity },
    /// The caller does not hold the product.
    NotOwner {
        product_id: ProductId,
        caller: Identity,
    },
    /// The product does not exist.
    UnknownProduct { product_id: ProductId },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// `Ok(())` for [`Decision::Allow`], otherwise the matching rejection.
    pub fn into_result(self) -> Result<(), CustodyError> {
        match self {
            Self::Allow => Ok(()),
            Self::MissingRole { role, caller } => Err(CustodyError::Authorization { role, caller }),
            Self::NotOwner { product_id, caller } => {
                Err(CustodyError::Ownership { product_id, caller })
            }
            Self::UnknownProduct { product_id } => Err(CustodyError::NotFound { product_id }),
        }
    }
}

/// Decide whether `caller` may perform `op` against `ledger`.
///
/// Pure: reads the ledger, never changes it.
pub fn evaluate(ledger: &Ledger, caller: &Identity, op: &Operation) -> Decision {
    if let Some(role) = op.required_role() {
        if !ledger.roles().has_role(role, caller) {
            return Decision::MissingRole {
                role,
                caller: caller.clone(),
            };
        }
    }
    if let Some(product_id) = op.custody_target() {
        match ledger.products().get(product_id) {
            Err(_) => return Decision::UnknownProduct { product_id },
            Ok(product) if !product.is_owned_by(caller) => {
                return Decision::NotOwner {
                    product_id,
                    caller: caller.clone(),
                }
            }
            Ok(_) => {}
        }
    }
    Decision::Allow
}
