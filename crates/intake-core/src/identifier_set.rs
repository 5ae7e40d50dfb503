//! # Identifier Set
//!
//! The ordered, unique collection of identifiers accumulated for one
//! product-edit session.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Identifier Set Lifecycle                             │
//! │                                                                         │
//! │  Dialog opens (new product) ────► IdentifierSet::new()                  │
//! │                                                                         │
//! │  Dialog opens (edit product) ───► IdentifierSet::with_identifiers(..)   │
//! │                                   (stored identifiers, deduplicated)    │
//! │                                                                         │
//! │  Candidate accepted ────────────► add(identifier)                       │
//! │                                                                         │
//! │  Operator deletes a row ────────► remove(&identifier)                   │
//! │                                                                         │
//! │  Dialog saves ──────────────────► snapshot() folded into the record     │
//! │                                                                         │
//! │  Dialog cancels ────────────────► set dropped, nothing persisted        │
//! │                                                                         │
//! │  NOTE: add() is the ONLY mutation reachable from the validation         │
//! │        pipeline. It re-checks membership itself, so it holds the        │
//! │        uniqueness invariant even if an upstream check races.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreResult, SetError};
use crate::identifier::Identifier;
use crate::MAX_IDENTIFIERS_PER_PRODUCT;

// =============================================================================
// Identifier Set
// =============================================================================

/// Ordered collection of unique identifiers for one product-edit session.
///
/// ## Invariants
/// - No two elements are equal (byte-exact comparison)
/// - Insertion order is preserved; display order matches entry order
/// - Maximum size: [`MAX_IDENTIFIERS_PER_PRODUCT`]
#[derive(Debug, Clone, Default)]
pub struct IdentifierSet {
    /// Entries in insertion order. A Vec keeps display order stable; linear
    /// membership scans are fine at per-product cardinality.
    entries: Vec<Identifier>,
}

impl IdentifierSet {
    /// Creates a new empty set.
    pub fn new() -> Self {
        IdentifierSet {
            entries: Vec::new(),
        }
    }

    /// Creates a set pre-populated from an existing product's stored
    /// identifiers.
    ///
    /// Stored data may predate the uniqueness invariant, so duplicates are
    /// silently dropped rather than rejected. Entries past the per-product
    /// cap are dropped too.
    pub fn with_identifiers<I>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = Identifier>,
    {
        let mut set = IdentifierSet::new();
        for identifier in identifiers {
            if set.entries.len() >= MAX_IDENTIFIERS_PER_PRODUCT {
                break;
            }
            if !set.contains(&identifier) {
                set.entries.push(identifier);
            }
        }
        set
    }

    /// Exact-match membership test over current elements.
    pub fn contains(&self, candidate: &Identifier) -> bool {
        self.entries.iter().any(|entry| entry == candidate)
    }

    /// Appends an identifier if not already present.
    ///
    /// This is the last line of defense for the uniqueness invariant: even
    /// if an upstream membership check raced with another source, the add
    /// itself refuses duplicates.
    pub fn add(&mut self, identifier: Identifier) -> CoreResult<()> {
        if self.contains(&identifier) {
            return Err(SetError::AlreadyPresent(identifier));
        }
        if self.entries.len() >= MAX_IDENTIFIERS_PER_PRODUCT {
            return Err(SetError::CapacityExceeded {
                max: MAX_IDENTIFIERS_PER_PRODUCT,
            });
        }
        self.entries.push(identifier);
        Ok(())
    }

    /// Removes the matching element.
    pub fn remove(&mut self, identifier: &Identifier) -> CoreResult<()> {
        let initial_len = self.entries.len();
        self.entries.retain(|entry| entry != identifier);

        if self.entries.len() == initial_len {
            Err(SetError::NotFound(identifier.clone()))
        } else {
            Ok(())
        }
    }

    /// Returns a read-only copy of the entries in insertion order.
    ///
    /// Callers get an owned Vec, never a live reference: the UI renders the
    /// copy and issues add/remove requests through the engine, so the
    /// uniqueness invariant cannot be violated from outside.
    pub fn snapshot(&self) -> Vec<Identifier> {
        self.entries.clone()
    }

    /// Removes all entries (dialog reset).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of identifiers in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
