//! # Event Journal
//!
//! Append-only record of every committed ledger change. Entries carry a
//! sequence number starting at 1 and the time of commit. Rejected
//! operations and no-op role changes append nothing.

use serde::{Deserialize, Serialize};

use custody_core::{Identity, ProductId, ProductStatus, Role, Timestamp};

use crate::error::SnapshotError;

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEventKind {
    RoleGranted {
        role: Role,
        account: Identity,
        sender: Identity,
    },
    RoleRevoked {
        role: Role,
        account: Identity,
        sender: Identity,
    },
    ProductCreated {
        product_id: ProductId,
        creator: Identity,
        details: String,
    },
    ShipmentTransferred {
        product_id: ProductId,
        from: Identity,
        to: Identity,
        prior_status: ProductStatus,
    },
    ReceiptRecorded {
        product_id: ProductId,
        custodian: Identity,
    },
}

impl LedgerEventKind {
    /// The product this event concerns, if any.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            Self::ProductCreated { product_id, .. }
            | Self::ShipmentTransferred { product_id, .. }
            | Self::ReceiptRecorded { product_id, .. } => Some(*product_id),
            Self::RoleGranted { .. } | Self::RoleRevoked { .. } => None,
        }
    }
}

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Position in the journal, starting at 1.
    pub seq: u64,
    /// When the change was committed.
    pub recorded_at: Timestamp,
    #[serde(flatten)]
    pub kind: LedgerEventKind,
}

/// The append-only journal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LedgerEvent>", into = "Vec<LedgerEvent>")]
pub struct Journal {
    events: Vec<LedgerEvent>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sequence number of the latest entry, or 0 for an empty journal.
    pub fn head(&self) -> u64 {
        self.events.len() as u64
    }

    /// Entries with a sequence number greater than `seq`.
    pub fn since(&self, seq: u64) -> &[LedgerEvent] {
        let start = usize::try_from(seq).unwrap_or(usize::MAX).min(self.events.len());
        &self.events[start..]
    }

    /// Entries concerning `product_id`, oldest first.
    pub fn for_product(&self, product_id: ProductId) -> Vec<LedgerEvent> {
        self.events
            .iter()
            .filter(|event| event.kind.product_id() == Some(product_id))
            .cloned()
            .collect()
    }

    pub(crate) fn append(&mut self, kind: LedgerEventKind) -> u64 {
        let seq = self.head() + 1;
        self.events.push(LedgerEvent {
            seq,
            recorded_at: Timestamp::now(),
            kind,
        });
        seq
    }
}

impl TryFrom<Vec<LedgerEvent>> for Journal {
    type Error = SnapshotError;

    fn try_from(events: Vec<LedgerEvent>) -> Result<Self, Self::Error> {
        for (position, event) in events.iter().enumerate() {
            let expected = position as u64 + 1;
            if event.seq != expected {
                return Err(SnapshotError::NonSequentialJournal {
                    position,
                    found: event.seq,
                    expected,
                });
            }
        }
        Ok(Self { events })
    }
}

impl From<Journal> for Vec<LedgerEvent> {
    fn from(journal: Journal) -> Self {
        journal.events
    }
}
