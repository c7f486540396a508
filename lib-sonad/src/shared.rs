//! Thread-safe handle to one ledger
//!
//! Each closure passed to [`SharedSonad::write`] runs inside a single
//! write-lock critical section, so a whole operation (check-then-set on a
//! vote record, settle-then-accumulate on a tip) never interleaves with
//! another writer. Readers take the read lock and see committed state only.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::contract::{Sonad, SonadState};

/// Cloneable single-writer handle
#[derive(Clone, Debug)]
pub struct SharedSonad {
    inner: Arc<RwLock<Sonad>>,
}

impl SharedSonad {
    pub fn new(sonad: Sonad) -> Self {
        Self {
            inner: Arc::new(RwLock::new(sonad)),
        }
    }

    /// Run one mutating call under the write lock
    pub fn write<R>(&self, op: impl FnOnce(&mut Sonad) -> R) -> R {
        let mut sonad = self.inner.write();
        op(&mut sonad)
    }

    /// Run a query under the read lock
    pub fn read<R>(&self, query: impl FnOnce(&Sonad) -> R) -> R {
        let sonad = self.inner.read();
        query(&sonad)
    }

    /// Consistent copy of the state for persistence
    pub fn snapshot(&self) -> SonadState {
        self.inner.read().snapshot()
    }
}
