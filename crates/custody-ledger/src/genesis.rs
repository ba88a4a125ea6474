//! # Genesis Configuration
//!
//! YAML file naming the administrative identity and any roles to assign
//! before the ledger accepts its first call:
//!
//! ```yaml
//! admin: "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
//! grants:
//!   - role: MANUFACTURER
//!     account: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
//!   - role: DISTRIBUTOR
//!     account: "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use custody_core::{Identity, Role};

use crate::error::GenesisError;

/// A role assignment applied at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisGrant {
    pub role: Role,
    pub account: Identity,
}

/// Initial ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Genesis {
    /// Identity holding `ADMIN` from the start.
    pub admin: Identity,
    /// Roles assigned before the first call.
    #[serde(default)]
    pub grants: Vec<GenesisGrant>,
}

impl Genesis {
    /// A genesis with only an admin.
    pub fn with_admin(admin: Identity) -> Self {
        Self {
            admin,
            grants: Vec::new(),
        }
    }

    /// Parse a genesis document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, GenesisError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a genesis file.
    pub fn from_path(path: &Path) -> Result<Self, GenesisError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| GenesisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_admin_and_grants() {
        let g = Genesis::from_yaml_str(
            r#"
admin: deployer
grants:
  - role: MANUFACTURER
    account: acme
  - role: RETAILER
    account: shop
"#,
        )
        .unwrap();
        assert_eq!(g.admin.as_str(), "deployer");
        assert_eq!(g.grants.len(), 2);
        assert_eq!(g.grants[0].role, Role::Manufacturer);
        assert_eq!(g.grants[1].account.as_str(), "shop");
    }

    #[test]
    fn grants_default_to_empty() {
        let g = Genesis::from_yaml_str("admin: deployer\n").unwrap();
        assert!(g.grants.is_empty());
    }

    #[test]
    fn rejects_unknown_role() {
        let err = Genesis::from_yaml_str(
            "admin: deployer\ngrants:\n  - role: AUDITOR\n    account: x\n",
        )
        .unwrap_err();
        assert!(matches!(err, GenesisError::Parse(_)));
    }

    #[test]
    fn rejects_invalid_identity() {
        assert!(Genesis::from_yaml_str("admin: \"\"\n").is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(Genesis::from_yaml_str("admin: a\nowner: b\n").is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Genesis::from_path(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, GenesisError::Io { .. }));
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("genesis.yaml");
        std::fs::write(&path, "admin: deployer\n").unwrap();
        assert_eq!(Genesis::from_path(&path).unwrap().admin.as_str(), "deployer");
    }
}
