//! # Access Gate
//!
//! The single entry surface for every ledger mutation. Each operation takes
//! the ledger lock, evaluates the access policy, applies the change, and
//! journals it, all before releasing the lock. A rejection at any step
//! returns before anything is written, so the ledger is left exactly as it
//! was.
//!
//! Reads take the same lock briefly and return owned snapshots.

use std::sync::Arc;

use parking_lot::Mutex;

use custody_core::{CustodyError, Identity, ProductId, Role};
use custody_state::ProductState;

use crate::journal::{LedgerEvent, LedgerEventKind};
use crate::ledger::Ledger;
use crate::policy::{self, Operation};

/// Shared handle to the ledger. Cloning is cheap; all clones serialize on
/// the same lock.
#[derive(Debug, Clone)]
pub struct AccessGate {
    ledger: Arc<Mutex<Ledger>>,
}

impl AccessGate {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger: Arc::new(Mutex::new(ledger)),
        }
    }

    // -- Role administration ------------------------------------------------

    /// Add `account` to `role`. Admin only.
    ///
    /// Returns `false` when `account` already held the role; nothing is
    /// journaled in that case.
    pub fn grant_role(
        &self,
        caller: &Identity,
        role: Role,
        account: Identity,
    ) -> Result<bool, CustodyError> {
        let mut guard = self.ledger.lock();
        let ledger = &mut *guard;
        authorize(ledger, caller, Operation::GrantRole { role })?;

        if !ledger.roles.grant(role, account.clone()) {
            tracing::debug!(%role, %account, "role already held");
            return Ok(false);
        }
        let seq = ledger.journal.append(LedgerEventKind::RoleGranted {
            role,
            account: account.clone(),
            sender: caller.clone(),
        });
        tracing::info!(seq, %role, %account, sender = %caller, "role granted");
        Ok(true)
    }

    /// Remove `account` from `role`. Admin only.
    ///
    /// Only future origination checks see the change; products the account
    /// already holds stay with it. Returns `false` when `account` did not
    /// hold the role.
    pub fn revoke_role(
        &self,
        caller: &Identity,
        role: Role,
        account: &Identity,
    ) -> Result<bool, CustodyError> {
        let mut guard = self.ledger.lock();
        let ledger = &mut *guard;
        authorize(ledger, caller, Operation::RevokeRole { role })?;

        if !ledger.roles.revoke(role, account) {
            tracing::debug!(%role, %account, "role not held");
            return Ok(false);
        }
        let seq = ledger.journal.append(LedgerEventKind::RoleRevoked {
            role,
            account: account.clone(),
            sender: caller.clone(),
        });
        tracing::info!(seq, %role, %account, sender = %caller, "role revoked");
        Ok(true)
    }

    pub fn has_role(&self, role: Role, account: &Identity) -> bool {
        self.ledger.lock().roles.has_role(role, account)
    }

    /// Every role `account` holds.
    pub fn roles_of(&self, account: &Identity) -> Vec<Role> {
        self.ledger.lock().roles.roles_of(account)
    }

    // -- Origination ----------------------------------------------------------

    /// Create a product owned by `caller`. Requires `MANUFACTURER`.
    ///
    /// Returns the new product's state as committed. A rejected call
    /// allocates no id.
    pub fn create_product(
        &self,
        caller: &Identity,
        details: impl Into<String>,
    ) -> Result<ProductState, CustodyError> {
        let details = details.into();
        let mut guard = self.ledger.lock();
        let ledger = &mut *guard;
        authorize(ledger, caller, Operation::CreateProduct)?;

        let product_id = ledger.products.create(details.clone(), caller.clone());
        let seq = ledger.journal.append(LedgerEventKind::ProductCreated {
            product_id,
            creator: caller.clone(),
            details,
        });
        tracing::info!(seq, %product_id, creator = %caller, "product created");
        Ok(ledger.products.get(product_id)?.state())
    }

    // -- Custody transitions -------------------------------------------------

    /// Hand the product to `to`. Caller must be the current owner; works from
    /// any status and always leaves the product `IN_TRANSIT`.
    pub fn transfer_shipment(
        &self,
        caller: &Identity,
        product_id: ProductId,
        to: Identity,
    ) -> Result<ProductState, CustodyError> {
        let op = Operation::TransferShipment { product_id };
        let mut guard = self.ledger.lock();
        let ledger = &mut *guard;
        authorize(ledger, caller, op)?;

        let product = ledger
            .products
            .get_mut(product_id)
            .map_err(|err| rejected(op, caller, err))?;
        let record = product
            .transfer(caller, to)
            .map_err(|err| rejected(op, caller, err))?;
        let state = product.state();

        let seq = ledger.journal.append(LedgerEventKind::ShipmentTransferred {
            product_id,
            from: record.from_owner,
            to: record.to_owner,
            prior_status: record.from_status,
        });
        tracing::info!(
            seq,
            %product_id,
            caller = %caller,
            owner = %state.owner,
            status = %state.status,
            "shipment transferred"
        );
        Ok(state)
    }

    /// Mark an in-transit product as received. Caller must be the current
    /// owner; the owner does not change.
    pub fn record_receipt(
        &self,
        caller: &Identity,
        product_id: ProductId,
    ) -> Result<ProductState, CustodyError> {
        let op = Operation::RecordReceipt { product_id };
        let mut guard = self.ledger.lock();
        let ledger = &mut *guard;
        authorize(ledger, caller, op)?;

        let product = ledger
            .products
            .get_mut(product_id)
            .map_err(|err| rejected(op, caller, err))?;
        product
            .record_receipt(caller)
            .map_err(|err| rejected(op, caller, err))?;
        let state = product.state();

        let seq = ledger.journal.append(LedgerEventKind::ReceiptRecorded {
            product_id,
            custodian: caller.clone(),
        });
        tracing::info!(seq, %product_id, custodian = %caller, "receipt recorded");
        Ok(state)
    }

    // -- Reads ------------------------------------------------------------------

    pub fn get_product_state(&self, product_id: ProductId) -> Result<ProductState, CustodyError> {
        self.ledger
            .lock()
            .products
            .get(product_id)
            .map(|product| product.state())
    }

    /// Journal entries for one product, oldest first.
    pub fn product_history(&self, product_id: ProductId) -> Result<Vec<LedgerEvent>, CustodyError> {
        let ledger = self.ledger.lock();
        ledger.products.get(product_id)?;
        Ok(ledger.journal.for_product(product_id))
    }

    /// All products, ascending by id.
    pub fn list_products(&self) -> Vec<ProductState> {
        self.ledger
            .lock()
            .products
            .iter()
            .map(|product| product.state())
            .collect()
    }

    /// Journal entries after sequence number `seq`.
    pub fn events_since(&self, seq: u64) -> Vec<LedgerEvent> {
        self.ledger.lock().journal.since(seq).to_vec()
    }

    /// The current journal head together with the entries after `seq`,
    /// read under one lock. The head is reported even when `seq` is past it.
    pub fn journal_since(&self, seq: u64) -> (u64, Vec<LedgerEvent>) {
        let ledger = self.ledger.lock();
        (ledger.journal.head(), ledger.journal.since(seq).to_vec())
    }

    /// Sequence number of the latest journal entry.
    pub fn journal_head(&self) -> u64 {
        self.ledger.lock().journal.head()
    }

    /// A consistent copy of the whole ledger, for persistence.
    pub fn snapshot(&self) -> Ledger {
        self.ledger.lock().clone()
    }
}

fn authorize(ledger: &Ledger, caller: &Identity, op: Operation) -> Result<(), CustodyError> {
    policy::evaluate(ledger, caller, &op)
        .into_result()
        .map_err(|err| rejected(op, caller, err))
}

fn rejected(op: Operation, caller: &Identity, err: CustodyError) -> CustodyError {
    tracing::warn!(operation = %op, %caller, code = err.code(), error = %err, "operation rejected");
    err
}
