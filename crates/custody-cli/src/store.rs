//! # Ledger Snapshot Store
//!
//! A ledger persisted as one pretty-printed JSON file. Mutating commands
//! load it, run a single operation through an [`AccessGate`], and write the
//! result back only if the operation committed. Writes go to a uniquely
//! named sibling temporary file that is synced and then renamed over the
//! snapshot, so a crash never leaves a half-written ledger.
//!
//! Concurrent processes are serialized through an advisory lock on a
//! sibling `.lock` file: exclusive for the whole load-operate-save of a
//! transaction, shared for reads.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;
use thiserror::Error;

use custody_core::CustodyError;
use custody_ledger::{AccessGate, Ledger};

/// The snapshot file could not be used.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no ledger at {}; run `custody init` first", path.display())]
    Missing { path: PathBuf },

    #[error("ledger already exists at {}; pass --force to overwrite", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid ledger, including one whose ids or journal
    /// sequence were edited out of order.
    #[error("corrupt ledger {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A single operation failed, either at the store or in the ledger.
#[derive(Error, Debug)]
pub enum TransactError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Rejected(#[from] CustodyError),
}

/// Handle to a snapshot file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write a brand-new ledger. Refuses to replace an existing one unless
    /// `overwrite` is set.
    pub fn create(&self, ledger: &Ledger, overwrite: bool) -> Result<(), StoreError> {
        if let Some(parent) = self.parent_dir() {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let _lock = self.lock(LockMode::Exclusive)?;
        if self.exists() && !overwrite {
            return Err(StoreError::AlreadyExists {
                path: self.path.clone(),
            });
        }
        self.save(ledger)
    }

    pub fn load(&self) -> Result<Ledger, StoreError> {
        let bytes = std::fs::read(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::Missing {
                    path: self.path.clone(),
                }
            } else {
                StoreError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Atomically replace the snapshot with `ledger`. Callers that may race
    /// with other processes hold the exclusive lock around this.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let parent = self.parent_dir().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        let mut json = serde_json::to_vec_pretty(ledger).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        json.push(b'\n');

        let mut tmp = NamedTempFile::new_in(parent).map_err(|source| self.io_error(source))?;
        tmp.write_all(&json).map_err(|source| self.io_error(source))?;
        tmp.as_file()
            .sync_all()
            .map_err(|source| self.io_error(source))?;
        tmp.persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        tracing::debug!(path = %self.path.display(), bytes = json.len(), "ledger saved");
        Ok(())
    }

    /// Run one operation against the stored ledger and persist the result
    /// if, and only if, it succeeds. Other processes are held off from
    /// before the load until after the save.
    pub fn transact<T>(
        &self,
        op: impl FnOnce(&AccessGate) -> Result<T, CustodyError>,
    ) -> Result<T, TransactError> {
        self.require_existing()?;
        let _lock = self.lock(LockMode::Exclusive)?;
        let gate = AccessGate::new(self.load()?);
        let value = op(&gate)?;
        self.save(&gate.snapshot())?;
        Ok(value)
    }

    /// Run a read against the stored ledger. Nothing is written.
    pub fn read<T>(&self, op: impl FnOnce(&AccessGate) -> T) -> Result<T, StoreError> {
        self.require_existing()?;
        let _lock = self.lock(LockMode::Shared)?;
        let gate = AccessGate::new(self.load()?);
        Ok(op(&gate))
    }

    /// Path of the advisory lock file next to the snapshot.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Block until the lock is held. Released when the returned file drops.
    fn lock(&self, mode: LockMode) -> Result<File, StoreError> {
        let lock_path = self.lock_path();
        let io_err = |source: std::io::Error| StoreError::Io {
            path: lock_path.clone(),
            source,
        };
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_err)?;
        let locked = match mode {
            LockMode::Exclusive => file.lock_exclusive(),
            LockMode::Shared => file.lock_shared(),
        };
        locked.map_err(io_err)?;
        tracing::trace!(path = %lock_path.display(), ?mode, "ledger lock acquired");
        Ok(file)
    }

    fn require_existing(&self) -> Result<(), StoreError> {
        if self.exists() {
            Ok(())
        } else {
            Err(StoreError::Missing {
                path: self.path.clone(),
            })
        }
    }

    fn parent_dir(&self) -> Option<&Path> {
        self.path.parent().filter(|p| !p.as_os_str().is_empty())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Exclusive,
    Shared,
}
