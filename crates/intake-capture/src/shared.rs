//! # Shared Identifier Set
//!
//! Single-owner wrapper around the per-dialog [`IdentifierSet`].
//!
//! ## Thread Safety
//! The set is wrapped in `Arc<Mutex<T>>` because:
//! 1. Validators for different sources run concurrently
//! 2. Only one of them may perform the check-then-add sequence at a time
//! 3. The UI thread reads snapshots while validations are in flight
//!
//! The lock is never held across an await point: membership checks and the
//! terminal add are synchronous and fast, while the remote-registry lookup
//! happens strictly between lock acquisitions. That makes each `add`
//! individually atomic against every other validator.
//!
//! ## Why Not RwLock?
//! Set operations are quick and most of them mutate. A RwLock would add
//! complexity with minimal benefit.

use std::sync::{Arc, Mutex};

use intake_core::{Identifier, IdentifierSet};

// =============================================================================
// Shared Identifier Set
// =============================================================================

/// Clonable handle to the per-dialog identifier set.
///
/// Every mutation in the engine goes through this wrapper; the UI layer
/// only ever sees [`snapshot`](SharedIdentifierSet::snapshot) copies.
#[derive(Debug, Clone)]
pub struct SharedIdentifierSet {
    inner: Arc<Mutex<IdentifierSet>>,
}

impl SharedIdentifierSet {
    /// Wraps a set (empty for a new product, pre-populated for an edit).
    pub fn new(set: IdentifierSet) -> Self {
        SharedIdentifierSet {
            inner: Arc::new(Mutex::new(set)),
        }
    }

    /// Executes a function with read access to the set.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&IdentifierSet) -> R,
    {
        let set = self.inner.lock().expect("identifier set mutex poisoned");
        f(&set)
    }

    /// Executes a function with write access to the set.
    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut IdentifierSet) -> R,
    {
        let mut set = self.inner.lock().expect("identifier set mutex poisoned");
        f(&mut set)
    }

    /// Returns a read-only copy of the entries in insertion order.
    pub fn snapshot(&self) -> Vec<Identifier> {
        self.with(|set| set.snapshot())
    }
}

impl Default for SharedIdentifierSet {
    fn default() -> Self {
        Self::new(IdentifierSet::new())
    }
}
