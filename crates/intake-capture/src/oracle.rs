//! # Uniqueness Oracle
//!
//! Trait seam for the remote authoritative registry of committed
//! identifiers. The host application implements this over its document
//! store; the engine only depends on the contract below.

use async_trait::async_trait;

use crate::error::OracleError;

// =============================================================================
// Uniqueness Oracle Trait
// =============================================================================

/// Lookup against the authoritative registry of all committed identifiers.
///
/// ## Contract
/// - Fallible: a failed lookup surfaces as an error verdict, never as
///   "unique" or "duplicate" (fail-closed)
/// - Cancellable: callers may drop the returned future at any point; a
///   dropped lookup must have no observable effect
/// - No retry or timeout policy is imposed here; implementations own both
#[async_trait]
pub trait UniquenessOracle: Send + Sync {
    /// Returns whether any committed product already contains `identifier`.
    async fn exists_remotely(&self, identifier: &str) -> Result<bool, OracleError>;
}
