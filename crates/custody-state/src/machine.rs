//! # Transition Table
//!
//! The status half of the custody state machine. Ownership checks live on
//! [`Product`](crate::Product); this module only answers "from this status,
//! where does this action lead?".

use std::fmt;

use serde::{Deserialize, Serialize};

use custody_core::ProductStatus;

/// An action that moves a product through its custody chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustodyAction {
    /// Hand custody to another identity.
    Transfer,
    /// Acknowledge receipt of a product in transit.
    RecordReceipt,
}

impl CustodyAction {
    /// The status this action produces from `from`, or `None` if the action
    /// is not permitted from that status.
    pub fn target(&self, from: ProductStatus) -> Option<ProductStatus> {
        match (self, from) {
            (Self::Transfer, _) => Some(ProductStatus::InTransit),
            (Self::RecordReceipt, ProductStatus::InTransit) => Some(ProductStatus::Received),
            (Self::RecordReceipt, ProductStatus::Created | ProductStatus::Received) => None,
        }
    }

    /// The canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "TRANSFER",
            Self::RecordReceipt => "RECORD_RECEIPT",
        }
    }
}

impl fmt::Display for CustodyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
