//! Thread-safe handle to a ledger.
//!
//! All transactions take the write lock for their full duration, so they are
//! serialized and no reader ever sees a half-applied update.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::transaction::{Receipt, Transaction};

#[derive(Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn apply(&self, tx: &Transaction) -> Result<Receipt, LedgerError> {
        self.inner.write().apply(tx)
    }

    /// Run a read-only closure against a consistent view of the ledger.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.inner.read())
    }
}
