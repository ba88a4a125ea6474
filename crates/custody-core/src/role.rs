//! # Roles
//!
//! Named permission classes. `MANUFACTURER` gates origination; `ADMIN` gates
//! role administration. `DISTRIBUTOR` and `RETAILER` are recorded for
//! participants but grant no ledger capability of their own: custody moves
//! by possession, not by title.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A role an identity may hold. An identity may hold any number of roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// May originate product records.
    Manufacturer,
    /// Intermediate holder in the custody chain.
    Distributor,
    /// Final holder in the custody chain.
    Retailer,
    /// May grant and revoke roles.
    Admin,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 4] = [
        Role::Manufacturer,
        Role::Distributor,
        Role::Retailer,
        Role::Admin,
    ];

    /// The canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manufacturer => "MANUFACTURER",
            Self::Distributor => "DISTRIBUTOR",
            Self::Retailer => "RETAILER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses case-insensitively. A trailing `_ROLE` suffix is accepted, so
/// `manufacturer`, `MANUFACTURER`, and `MANUFACTURER_ROLE` are equivalent.
impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_suffix("_ROLE").unwrap_or(&upper);
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == name)
            .ok_or_else(|| ValidationError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("manufacturer".parse::<Role>().unwrap(), Role::Manufacturer);
        assert_eq!("Retailer".parse::<Role>().unwrap(), Role::Retailer);
    }

    #[test]
    fn parse_accepts_role_suffix() {
        assert_eq!(
            "DISTRIBUTOR_ROLE".parse::<Role>().unwrap(),
            Role::Distributor
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(
            "auditor".parse::<Role>(),
            Err(ValidationError::UnknownRole("auditor".to_string()))
        );
    }

    #[test]
    fn display_matches_serde() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}
