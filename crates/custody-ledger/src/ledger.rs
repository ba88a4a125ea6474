//! # Ledger State
//!
//! The single owned store: role registry, product registry, and journal.
//! Read access is public; every mutation is crate-private and reached only
//! through the [`AccessGate`](crate::AccessGate), which holds the ledger
//! behind one lock.
//!
//! A `Ledger` serializes to a self-contained snapshot. Deserialization
//! re-checks the id and journal sequencing, so a tampered snapshot is
//! rejected instead of loaded.

use serde::{Deserialize, Serialize};

use custody_core::{Identity, Role};

use crate::genesis::Genesis;
use crate::journal::{Journal, LedgerEventKind};
use crate::products::ProductRegistry;
use crate::roles::RoleRegistry;

/// All custody state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub(crate) roles: RoleRegistry,
    pub(crate) products: ProductRegistry,
    pub(crate) journal: Journal,
}

impl Ledger {
    /// An empty ledger administered by `admin`.
    pub fn new(admin: Identity) -> Self {
        let mut journal = Journal::new();
        journal.append(LedgerEventKind::RoleGranted {
            role: Role::Admin,
            account: admin.clone(),
            sender: admin.clone(),
        });
        Self {
            roles: RoleRegistry::new(admin),
            products: ProductRegistry::new(),
            journal,
        }
    }

    /// A ledger seeded from a genesis configuration. Initial grants are
    /// journaled as issued by the genesis admin.
    pub fn from_genesis(genesis: &Genesis) -> Self {
        let mut ledger = Self::new(genesis.admin.clone());
        for grant in &genesis.grants {
            if ledger.roles.grant(grant.role, grant.account.clone()) {
                ledger.journal.append(LedgerEventKind::RoleGranted {
                    role: grant.role,
                    account: grant.account.clone(),
                    sender: genesis.admin.clone(),
                });
            }
        }
        ledger
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn products(&self) -> &ProductRegistry {
        &self.products
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::GenesisGrant;

    fn who(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    #[test]
    fn new_ledger_journals_admin_grant() {
        let ledger = Ledger::new(who("deployer"));
        assert!(ledger.roles().has_role(Role::Admin, &who("deployer")));
        assert_eq!(ledger.journal().len(), 1);
        assert!(ledger.products().is_empty());
    }

    #[test]
    fn genesis_applies_grants_once() {
        let genesis = Genesis {
            admin: who("deployer"),
            grants: vec![
                GenesisGrant {
                    role: Role::Manufacturer,
                    account: who("m"),
                },
                GenesisGrant {
                    role: Role::Manufacturer,
                    account: who("m"),
                },
                GenesisGrant {
                    role: Role::Retailer,
                    account: who("r"),
                },
            ],
        };
        let ledger = Ledger::from_genesis(&genesis);
        assert!(ledger.roles().has_role(Role::Manufacturer, &who("m")));
        assert!(ledger.roles().has_role(Role::Retailer, &who("r")));
        // admin + two distinct grants
        assert_eq!(ledger.journal().len(), 3);
    }

    #[test]
    fn snapshot_roundtrip() {
        let ledger = Ledger::new(who("deployer"));
        let json = serde_json::to_string(&ledger).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn tampered_snapshot_rejected() {
        let ledger = Ledger::new(who("deployer"));
        let mut value = serde_json::to_value(&ledger).unwrap();
        value["journal"][0]["seq"] = serde_json::json!(5);
        assert!(serde_json::from_value::<Ledger>(value).is_err());
    }
}
