//! # Custody Status
//!
//! The lifecycle stage of a product. The ordinal encoding
//! (`0 = CREATED`, `1 = IN_TRANSIT`, `2 = RECEIVED`) is the persisted and
//! on-the-wire representation and must not be renumbered.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Where a product sits in its custody chain.
///
/// There is no terminal status: a received product can always be
/// transferred again by whoever holds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ProductStatus {
    /// Originated and still with its creator.
    Created = 0,
    /// Handed to a new custodian who has not yet acknowledged it.
    InTransit = 1,
    /// Acknowledged by its current custodian.
    Received = 2,
}

impl ProductStatus {
    /// The stable wire ordinal.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Decode a wire ordinal.
    pub fn from_ordinal(ordinal: u64) -> Result<Self, ValidationError> {
        match ordinal {
            0 => Ok(Self::Created),
            1 => Ok(Self::InTransit),
            2 => Ok(Self::Received),
            other => Err(ValidationError::UnknownStatus(other)),
        }
    }

    /// The canonical upper-case name used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::InTransit => "IN_TRANSIT",
            Self::Received => "RECEIVED",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProductStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for ProductStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ordinal = u64::deserialize(deserializer)?;
        Self::from_ordinal(ordinal).map_err(serde::de::Error::custom)
    }
}
