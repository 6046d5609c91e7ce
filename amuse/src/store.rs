// Copyright (c) 2024 Amuse Finance

//! On-disk ledger state.
//!
//! The whole ledger is stored as one pretty-printed JSON document. Writes go
//! to a uniquely named temp file in the same directory that is then renamed
//! over the target, so a crash mid-write leaves the previous state intact.
//!
//! Writers serialize on an advisory lock held on a sidecar `<state>.lock`
//! file. Hold a [`StateLock`] across load, apply and save; readers need no
//! lock since the rename is atomic.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use amd_token_ledger::{Ledger, LedgerError};
use nix::fcntl::{Flock, FlockArg};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Current state file format version
pub const STATE_VERSION: u32 = 1;

/// Errors that can occur while reading or writing ledger state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to lock {}: {source}", path.display())]
    Lock { path: PathBuf, source: io::Error },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, got {got}")]
    VersionMismatch { expected: u32, got: u32 },

    #[error("Invalid ledger state: {0}")]
    Invalid(#[from] LedgerError),
}

#[derive(Serialize, Deserialize)]
struct StateFile {
    version: u32,
    ledger: Ledger,
}

/// Exclusive write access to a state file. Released on drop.
pub struct StateLock {
    _flock: Flock<File>,
}

/// Ledger state persisted at a fixed path
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Sidecar file the writer lock is taken on
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Block until this process is the only writer
    pub fn lock(&self) -> Result<StateLock, StoreError> {
        fs::create_dir_all(self.dir())?;
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        let flock = Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, errno)| {
            StoreError::Lock {
                path: lock_path.clone(),
                source: io::Error::from(errno),
            }
        })?;

        debug!(path = %lock_path.display(), "Acquired state lock");
        Ok(StateLock { _flock: flock })
    }

    /// Read and validate the stored ledger
    pub fn load(&self) -> Result<Ledger, StoreError> {
        let contents = fs::read_to_string(&self.path)?;
        let file: StateFile = serde_json::from_str(&contents)?;
        if file.version != STATE_VERSION {
            return Err(StoreError::VersionMismatch {
                expected: STATE_VERSION,
                got: file.version,
            });
        }
        file.ledger.validate()?;
        debug!(path = %self.path.display(), "Loaded ledger state");
        Ok(file.ledger)
    }

    /// Atomically replace the stored ledger. Callers racing other writers
    /// must hold a [`StateLock`].
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let file = StateFile {
            version: STATE_VERSION,
            ledger: ledger.clone(),
        };
        let mut contents = serde_json::to_string_pretty(&file)?;
        contents.push('\n');

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| StoreError::Io(err.error))?;

        debug!(path = %self.path.display(), "Saved ledger state");
        Ok(())
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }
}
