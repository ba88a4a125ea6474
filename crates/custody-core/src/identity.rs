//! # Domain Identity Newtypes
//!
//! `Identity` names a caller (an address or key fingerprint); `ProductId`
//! names a tracked good. Both are validated at construction and during
//! deserialization, so a value of either type is always well-formed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Opaque, comparable caller identity.
///
/// Used both as a role-registry key and as the current custodian of a
/// product. Must be non-empty, free of whitespace and control characters,
/// and at most [`Identity::MAX_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Maximum identity length in bytes.
    pub const MAX_LEN: usize = 256;

    /// Validate and wrap an identity string.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyIdentity);
        }
        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::IdentityTooLong {
                len: value.len(),
                max: Self::MAX_LEN,
            });
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ValidationError::IdentityCharacters(value));
        }
        Ok(Self(value))
    }

    /// Borrow the identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl FromStr for Identity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequential product identifier. Always positive; the first product is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ProductId(u64);

impl ProductId {
    /// The id assigned to the first product a registry ever creates.
    pub const FIRST: ProductId = ProductId(1);

    /// Wrap a raw id. Zero is rejected.
    pub fn new(raw: u64) -> Result<Self, ValidationError> {
        if raw == 0 {
            return Err(ValidationError::InvalidProductId(raw.to_string()));
        }
        Ok(Self(raw))
    }

    /// The id of the product at zero-based position `index` in allocation
    /// order.
    pub fn from_index(index: usize) -> Self {
        Self((index as u64).saturating_add(1))
    }

    /// Zero-based allocation position; the inverse of [`ProductId::from_index`].
    /// `None` when the position does not fit in `usize`, in which case no
    /// registry can hold the product.
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.0 - 1).ok()
    }

    /// The raw integer value.
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id that follows this one, or `None` on overflow.
    pub fn next(&self) -> Option<ProductId> {
        self.0.checked_add(1).map(ProductId)
    }
}

impl TryFrom<u64> for ProductId {
    type Error = ValidationError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<ProductId> for u64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl FromStr for ProductId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u64 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidProductId(s.to_string()))?;
        Self::new(raw)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_accepts_address() {
        let id = Identity::new("0x70997970C51812dc3A010C7d01b50e0d17dc79C8").unwrap();
        assert_eq!(id.as_str(), "0x70997970C51812dc3A010C7d01b50e0d17dc79C8");
        assert_eq!(id.to_string(), id.as_str());
    }

    #[test]
    fn identity_rejects_empty() {
        assert_eq!(Identity::new(""), Err(ValidationError::EmptyIdentity));
    }

    #[test]
    fn identity_rejects_whitespace() {
        assert!(matches!(
            Identity::new("acme corp"),
            Err(ValidationError::IdentityCharacters(_))
        ));
        assert!(Identity::new("acme\n").is_err());
    }

    #[test]
    fn identity_rejects_oversized() {
        let long = "a".repeat(Identity::MAX_LEN + 1);
        assert!(matches!(
            Identity::new(long),
            Err(ValidationError::IdentityTooLong { len: 257, max: 256 })
        ));
        assert!(Identity::new("a".repeat(Identity::MAX_LEN)).is_ok());
    }

    #[test]
    fn identity_serde_is_a_plain_string() {
        let id = Identity::new("manufacturer-1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"manufacturer-1\"");
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn identity_deserialize_validates() {
        assert!(serde_json::from_str::<Identity>("\"\"").is_err());
        assert!(serde_json::from_str::<Identity>("\"a b\"").is_err());
    }

    #[test]
    fn product_id_rejects_zero() {
        assert!(ProductId::new(0).is_err());
        assert!(serde_json::from_str::<ProductId>("0").is_err());
    }

    #[test]
    fn product_id_first_is_one() {
        assert_eq!(ProductId::FIRST.get(), 1);
        assert_eq!(ProductId::FIRST.next().unwrap().get(), 2);
    }

    #[test]
    fn product_id_index_mapping() {
        assert_eq!(ProductId::from_index(0), ProductId::FIRST);
        assert_eq!(ProductId::from_index(9).get(), 10);
        assert_eq!(ProductId::new(10).unwrap().index(), Some(9));
    }

    #[test]
    fn product_id_index_never_truncates() {
        let id = ProductId::new(u64::MAX).unwrap();
        match usize::try_from(u64::MAX - 1) {
            Ok(expected) => assert_eq!(id.index(), Some(expected)),
            Err(_) => assert_eq!(id.index(), None),
        }
    }

    #[test]
    fn product_id_next_overflow() {
        assert!(ProductId::new(u64::MAX).unwrap().next().is_none());
    }

    #[test]
    fn product_id_parse() {
        assert_eq!("12".parse::<ProductId>().unwrap().get(), 12);
        assert!("abc".parse::<ProductId>().is_err());
        assert!("-1".parse::<ProductId>().is_err());
        assert!("0".parse::<ProductId>().is_err());
    }

    #[test]
    fn product_id_serializes_as_integer() {
        let id = ProductId::new(5).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
    }
}
