//! # Role Registry
//!
//! Maps each [`Role`] to the set of identities holding it. Queries are pure
//! and never fail. Mutation is `pub(crate)`: the admin check lives in the
//! access policy and every change goes through the
//! [`AccessGate`](crate::AccessGate).

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use custody_core::{Identity, Role};

/// Role → members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRegistry {
    members: BTreeMap<Role, BTreeSet<Identity>>,
}

impl RoleRegistry {
    /// A registry in which `admin` holds [`Role::Admin`] and nothing else is
    /// assigned.
    pub fn new(admin: Identity) -> Self {
        let mut registry = Self::default();
        registry.grant(Role::Admin, admin);
        registry
    }

    /// Whether `account` holds `role`.
    pub fn has_role(&self, role: Role, account: &Identity) -> bool {
        self.members
            .get(&role)
            .is_some_and(|set| set.contains(account))
    }

    /// All identities holding `role`, in sorted order.
    pub fn members(&self, role: Role) -> Vec<Identity> {
        self.members
            .get(&role)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Every role `account` holds.
    pub fn roles_of(&self, account: &Identity) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.has_role(*role, account))
            .collect()
    }

    /// Add `account` to `role`. Returns `false` if it already held the role.
    pub(crate) fn grant(&mut self, role: Role, account: Identity) -> bool {
        self.members.entry(role).or_default().insert(account)
    }

    /// Remove `account` from `role`. Returns `false` if it did not hold it.
    pub(crate) fn revoke(&mut self, role: Role, account: &Identity) -> bool {
        let Some(set) = self.members.get_mut(&role) else {
            return false;
        };
        let removed = set.remove(account);
        if set.is_empty() {
            self.members.remove(&role);
        }
        removed
    }
}
