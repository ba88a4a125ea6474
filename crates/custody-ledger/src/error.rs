//! # Ledger Errors
//!
//! Failures loading a ledger from outside: a genesis file that cannot be
//! read or parsed, or a snapshot whose contents break a ledger invariant.
//! Operation rejections are [`custody_core::CustodyError`], not these.

use std::path::PathBuf;

use thiserror::Error;

use custody_core::ProductId;

/// A genesis configuration could not be loaded.
#[derive(Error, Debug)]
pub enum GenesisError {
    /// The file could not be read.
    #[error("failed to read genesis file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The YAML is malformed or names an unknown role or invalid identity.
    #[error("invalid genesis configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// A persisted ledger breaks an invariant the live ledger maintains.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// Products are not stored contiguously from id 1.
    #[error("product at position {position} has id {found}, expected {expected}")]
    NonSequentialId {
        /// Zero-based position in the stored product list.
        position: usize,
        /// Id found at that position.
        found: ProductId,
        /// Id the position requires.
        expected: ProductId,
    },

    /// Journal sequence numbers are not strictly increasing from 1.
    #[error("journal entry at position {position} has sequence {found}, expected {expected}")]
    NonSequentialJournal {
        /// Zero-based position in the stored journal.
        position: usize,
        /// Sequence number found.
        found: u64,
        /// Sequence number required.
        expected: u64,
    },
}
