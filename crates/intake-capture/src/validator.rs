//! # Candidate Validator
//!
//! The two-stage uniqueness check every candidate passes through.
//!
//! ## Validation Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Candidate Validation                                 │
//! │                                                                         │
//! │  raw candidate string                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Trim; empty? ───────────────────────────► RejectedError("empty")    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. Already in this product's set? ─────────► RejectedLocalDuplicate    │
//! │       │                                       (NO remote call made -    │
//! │       │                                        the "scanned the same    │
//! │       ▼                                        tag twice" fast path)    │
//! │  3. Remote registry lookup (await)                                      │
//! │       ├── exists ───────────────────────────► RejectedRemoteDuplicate   │
//! │       ├── error ────────────────────────────► RejectedError(reason)     │
//! │       │                                       (fail-closed, no retry)   │
//! │       ▼                                                                 │
//! │  4. Cancelled while awaiting? ──────────────► no verdict at all         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  5. add() to the set                                                    │
//! │       ├── ok ───────────────────────────────► Accepted                  │
//! │       └── already present ──────────────────► RejectedLocalDuplicate    │
//! │           (a concurrent source won the race between step 2 and here)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 5 re-checks membership *after* the remote round trip because step 2
//! ran before it: another source may have inserted the same identifier in
//! between. The set lock makes the re-check-and-add atomic.

use tokio_util::sync::CancellationToken;
use tracing::debug;

use intake_core::{Identifier, SetError, ValidationVerdict};

use crate::oracle::UniquenessOracle;
use crate::shared::SharedIdentifierSet;

// =============================================================================
// Validation
// =============================================================================

/// Validates one raw candidate against the local set and the remote
/// registry.
///
/// Returns `None` when `cancel` tripped during the remote round trip: the
/// candidate is discarded without mutating the set or producing a verdict.
/// On `Some(Accepted)`, the identifier is already in the set.
pub async fn validate_candidate(
    raw: &str,
    set: &SharedIdentifierSet,
    oracle: &dyn UniquenessOracle,
    cancel: &CancellationToken,
) -> Option<ValidationVerdict> {
    // Stage 0: boundary normalization.
    let identifier = match Identifier::parse(raw) {
        Ok(identifier) => identifier,
        Err(err) => {
            debug!(candidate = raw, "Rejecting unparseable candidate");
            return Some(ValidationVerdict::RejectedError {
                candidate: raw.to_string(),
                message: err.to_string(),
            });
        }
    };

    // Stage 1: local membership. Resolved without network I/O.
    if set.with(|set| set.contains(&identifier)) {
        debug!(identifier = %identifier, "Local duplicate, skipping registry lookup");
        return Some(ValidationVerdict::RejectedLocalDuplicate {
            candidate: identifier,
        });
    }

    // Stage 2: remote registry. The only suspension point.
    match oracle.exists_remotely(identifier.as_str()).await {
        Ok(true) => {
            debug!(identifier = %identifier, "Registry already holds identifier");
            Some(ValidationVerdict::RejectedRemoteDuplicate {
                candidate: identifier,
            })
        }
        Ok(false) => {
            // The session may have been cancelled while we were waiting on
            // the registry; a cancelled validation must not mutate the set.
            if cancel.is_cancelled() {
                debug!(identifier = %identifier, "Cancelled during registry lookup, discarding");
                return None;
            }

            // Re-check-and-add, atomic under the set lock.
            match set.with_mut(|set| set.add(identifier.clone())) {
                Ok(()) => {
                    debug!(identifier = %identifier, "Candidate accepted");
                    Some(ValidationVerdict::Accepted { identifier })
                }
                Err(SetError::AlreadyPresent(_)) => {
                    debug!(
                        identifier = %identifier,
                        "Concurrent source inserted first, rejecting as local duplicate"
                    );
                    Some(ValidationVerdict::RejectedLocalDuplicate {
                        candidate: identifier,
                    })
                }
                Err(err) => {
                    debug!(identifier = %identifier, %err, "Set refused identifier");
                    Some(ValidationVerdict::RejectedError {
                        candidate: identifier.into_string(),
                        message: err.to_string(),
                    })
                }
            }
        }
        Err(err) => {
            debug!(identifier = %identifier, %err, "Registry lookup failed");
            Some(ValidationVerdict::RejectedError {
                candidate: identifier.into_string(),
                message: err.to_string(),
            })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockOracle;
    use std::sync::Arc;

    fn id(raw: &str) -> Identifier {
        Identifier::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_unique_candidate_is_accepted() {
        let set = SharedIdentifierSet::default();
        let oracle = MockOracle::new();
        let cancel = CancellationToken::new();

        let verdict = validate_candidate("A123", &set, oracle.as_ref(), &cancel)
            .await
            .unwrap();

        assert_eq!(
            verdict,
            ValidationVerdict::Accepted {
                identifier: id("A123")
            }
        );
        assert_eq!(set.snapshot(), vec![id("A123")]);
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn test_local_duplicate_skips_registry() {
        let set = SharedIdentifierSet::default();
        set.with_mut(|s| s.add(id("A123"))).unwrap();
        let oracle = MockOracle::new();
        let cancel = CancellationToken::new();

        let verdict = validate_candidate("A123", &set, oracle.as_ref(), &cancel)
            .await
            .unwrap();

        assert_eq!(
            verdict,
            ValidationVerdict::RejectedLocalDuplicate {
                candidate: id("A123")
            }
        );
        assert_eq!(set.snapshot(), vec![id("A123")]);
        // The fast path must never touch the registry.
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_duplicate_is_rejected() {
        let set = SharedIdentifierSet::default();
        let oracle = MockOracle::with_remote(&["B777"]);
        let cancel = CancellationToken::new();

        let verdict = validate_candidate("B777", &set, oracle.as_ref(), &cancel)
            .await
            .unwrap();

        assert_eq!(
            verdict,
            ValidationVerdict::RejectedRemoteDuplicate {
                candidate: id("B777")
            }
        );
        assert!(set.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_oracle_failure_fails_closed_and_retry_is_fresh() {
        let set = SharedIdentifierSet::default();
        let oracle = MockOracle::new();
        oracle.mark_failing("C000");
        let cancel = CancellationToken::new();

        let verdict = validate_candidate("C000", &set, oracle.as_ref(), &cancel)
            .await
            .unwrap();

        assert!(matches!(verdict, ValidationVerdict::RejectedError { .. }));
        assert!(set.snapshot().is_empty());
        assert_eq!(oracle.calls(), 1);

        // Re-submitting the same candidate performs a fresh lookup.
        oracle.clear_failing("C000");
        let verdict = validate_candidate("C000", &set, oracle.as_ref(), &cancel)
            .await
            .unwrap();

        assert!(verdict.is_accepted());
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_candidate_never_reaches_registry() {
        let set = SharedIdentifierSet::default();
        let oracle = MockOracle::new();
        let cancel = CancellationToken::new();

        let verdict = validate_candidate("   ", &set, oracle.as_ref(), &cancel)
            .await
            .unwrap();

        assert_eq!(
            verdict,
            ValidationVerdict::RejectedError {
                candidate: "   ".to_string(),
                message: "candidate is empty".to_string(),
            }
        );
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancellation_during_lookup_prevents_mutation() {
        let set = SharedIdentifierSet::default();
        let oracle = MockOracle::new();
        let gate = oracle.hold();
        let cancel = CancellationToken::new();

        let task = {
            let set = set.clone();
            let oracle = Arc::clone(&oracle);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                validate_candidate("A123", &set, oracle.as_ref(), &cancel).await
            })
        };

        // Cancel while the registry lookup is held in flight, then let the
        // lookup resolve "unique".
        oracle.wait_for_calls(1).await;
        cancel.cancel();
        gate.add_permits(1);

        let outcome = task.await.unwrap();
        assert_eq!(outcome, None);
        assert!(set.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_same_value_accepts_exactly_once() {
        let set = SharedIdentifierSet::default();
        let oracle = MockOracle::new();
        let gate = oracle.hold();
        let cancel = CancellationToken::new();

        let spawn_validation = |value: &str| {
            let value = value.to_string();
            let set = set.clone();
            let oracle = Arc::clone(&oracle);
            let cancel = cancel.clone();
            tokio::spawn(async move {
                validate_candidate(&value, &set, oracle.as_ref(), &cancel).await
            })
        };

        // Both validators pass the local check before either adds.
        let first = spawn_validation("A123");
        let second = spawn_validation("A123");
        oracle.wait_for_calls(2).await;
        gate.add_permits(2);

        let verdicts = [
            first.await.unwrap().unwrap(),
            second.await.unwrap().unwrap(),
        ];

        let accepted = verdicts.iter().filter(|v| v.is_accepted()).count();
        let local_dups = verdicts
            .iter()
            .filter(|v| matches!(v, ValidationVerdict::RejectedLocalDuplicate { .. }))
            .count();

        assert_eq!(accepted, 1);
        assert_eq!(local_dups, 1);
        assert_eq!(set.snapshot(), vec![id("A123")]);
    }
}
