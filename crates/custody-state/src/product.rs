//! # Product Record
//!
//! A tracked good and the custody half of its state machine. The immutable
//! fields (`id`, `details`, `creator`) are fixed at origination. `owner` and
//! `status` change only through [`Product::transfer`] and
//! [`Product::record_receipt`].

use serde::{Deserialize, Serialize};

use custody_core::{CustodyError, Identity, ProductId, ProductStatus, Timestamp};

use crate::machine::CustodyAction;

/// Point-in-time view of a product, as returned by `getProductState`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductState {
    pub id: ProductId,
    pub owner: Identity,
    pub status: ProductStatus,
    pub details: String,
    pub creator: Identity,
}

/// The effect of one committed custody transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The product that moved.
    pub product_id: ProductId,
    /// Which transition was applied.
    pub action: CustodyAction,
    /// The identity that requested the transition.
    pub caller: Identity,
    /// Owner before the transition.
    pub from_owner: Identity,
    /// Owner after the transition.
    pub to_owner: Identity,
    /// Status before the transition.
    pub from_status: ProductStatus,
    /// Status after the transition.
    pub to_status: ProductStatus,
}

/// A tracked good.
///
/// Fields are private so nothing outside this module can reassign the owner
/// or status, or touch the fields that are fixed at origination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    details: String,
    creator: Identity,
    owner: Identity,
    status: ProductStatus,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Product {
    /// Originate a product. The creator starts as the owner and the status is
    /// `CREATED`. `details` is stored as given.
    pub fn originate(id: ProductId, details: impl Into<String>, creator: Identity) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            details: details.into(),
            owner: creator.clone(),
            creator,
            status: ProductStatus::Created,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn details(&self) -> &str {
        &self.details
    }

    pub fn creator(&self) -> &Identity {
        &self.creator
    }

    pub fn owner(&self) -> &Identity {
        &self.owner
    }

    pub fn status(&self) -> ProductStatus {
        self.status
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the owner or status last changed.
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Whether `caller` currently holds this product.
    pub fn is_owned_by(&self, caller: &Identity) -> bool {
        &self.owner == caller
    }

    /// Snapshot of the externally visible fields.
    pub fn state(&self) -> ProductState {
        ProductState {
            id: self.id,
            owner: self.owner.clone(),
            status: self.status,
            details: self.details.clone(),
            creator: self.creator.clone(),
        }
    }

    /// Hand custody to `to` (any status → `IN_TRANSIT`).
    ///
    /// # Errors
    ///
    /// [`CustodyError::Ownership`] if `caller` is not the current owner.
    pub fn transfer(
        &mut self,
        caller: &Identity,
        to: Identity,
    ) -> Result<TransitionRecord, CustodyError> {
        let record = self.plan(CustodyAction::Transfer, caller, to)?;
        self.commit(&record);
        Ok(record)
    }

    /// Acknowledge receipt (`IN_TRANSIT` → `RECEIVED`). The owner is unchanged.
    ///
    /// # Errors
    ///
    /// - [`CustodyError::Ownership`] if `caller` is not the current owner.
    ///   Checked before the status, so a non-owner never learns more.
    /// - [`CustodyError::InvalidState`] if the product is not in transit.
    pub fn record_receipt(&mut self, caller: &Identity) -> Result<TransitionRecord, CustodyError> {
        let record = self.plan(CustodyAction::RecordReceipt, caller, self.owner.clone())?;
        self.commit(&record);
        Ok(record)
    }

    fn plan(
        &self,
        action: CustodyAction,
        caller: &Identity,
        to_owner: Identity,
    ) -> Result<TransitionRecord, CustodyError> {
        if !self.is_owned_by(caller) {
            return Err(CustodyError::Ownership {
                product_id: self.id,
                caller: caller.clone(),
            });
        }
        let to_status = action
            .target(self.status)
            .ok_or(CustodyError::InvalidState {
                product_id: self.id,
                status: self.status,
            })?;
        Ok(TransitionRecord {
            product_id: self.id,
            action,
            caller: caller.clone(),
            from_owner: self.owner.clone(),
            to_owner,
            from_status: self.status,
            to_status,
        })
    }

    fn commit(&mut self, record: &TransitionRecord) {
        self.owner = record.to_owner.clone();
        self.status = record.to_status;
        self.updated_at = Timestamp::now();
    }
}
