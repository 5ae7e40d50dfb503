//! # Capture Session
//!
//! Per-source validation pipeline: one session per input source, at most
//! one validation in flight per session.
//!
//! ## Session State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Capture Session States                                │
//! │                                                                         │
//! │  ┌────────────┐     submit      ┌────────────┐                          │
//! │  │    Idle    │ ──────────────► │ Validating │                          │
//! │  └────────────┘                 └─────┬──────┘                          │
//! │        ▲                              │                                 │
//! │        │          verdict emitted     │   newer submission arrives      │
//! │        │                        ┌─────┴─────┐                           │
//! │        │                        ▼           ▼                           │
//! │        │                 ┌────────────┐  ┌──────────────────────┐       │
//! │        └──────────────── │  Emit &    │  │ Abandon stale work,  │       │
//! │                          │  go idle   │  │ validate newest      │       │
//! │                          └────────────┘  └──────────────────────┘       │
//! │                                                                         │
//! │  SUPERSESSION                                                          │
//! │  ────────────                                                          │
//! │  Only the newest unconsumed candidate is meaningful: the latest        │
//! │  keystroke of the manual field, the latest camera capture. Anything    │
//! │  older is dropped without a verdict, so a stale frame's duplicate      │
//! │  warning can never land after the operator has moved on.               │
//! │                                                                         │
//! │  CANCELLATION                                                          │
//! │  ────────────                                                          │
//! │  Dialog teardown cancels the session token. In-flight work is          │
//! │  discarded: no set mutation, no verdict, no UI event.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use intake_core::CandidateSource;

use crate::emitter::CaptureEventEmitter;
use crate::error::{CaptureError, CaptureResult};
use crate::oracle::UniquenessOracle;
use crate::shared::SharedIdentifierSet;
use crate::validator::validate_candidate;

// =============================================================================
// Session Handle
// =============================================================================

/// Handle for submitting candidates to a running session.
#[derive(Clone)]
pub struct CaptureSessionHandle {
    /// Which source this session serves.
    source: CandidateSource,

    /// Sender for raw candidate strings.
    submit_tx: mpsc::Sender<String>,

    /// Session cancellation token.
    cancel: CancellationToken,
}

impl CaptureSessionHandle {
    /// The source this session serves.
    pub fn source(&self) -> CandidateSource {
        self.source
    }

    /// Submits a raw candidate for validation.
    ///
    /// Returns immediately once the candidate is enqueued; the verdict
    /// arrives later through the emitter. A candidate enqueued behind a
    /// newer one may be superseded and produce no verdict at all.
    pub async fn submit(&self, raw: impl Into<String>) -> CaptureResult<()> {
        self.submit_tx
            .send(raw.into())
            .await
            .map_err(|_| CaptureError::ShuttingDown)
    }

    /// Cancels the session: queued and in-flight work is discarded.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

// =============================================================================
// Capture Session
// =============================================================================

/// Per-source validation pipeline.
pub struct CaptureSession {
    /// Which source this session serves.
    source: CandidateSource,

    /// The per-dialog identifier set.
    set: SharedIdentifierSet,

    /// Remote registry lookup.
    oracle: Arc<dyn UniquenessOracle>,

    /// Verdict sink.
    emitter: Arc<dyn CaptureEventEmitter>,

    /// Receiver for submitted candidates.
    submit_rx: mpsc::Receiver<String>,

    /// Session cancellation token (child of the coordinator's root token).
    cancel: CancellationToken,
}

impl CaptureSession {
    /// Creates a new session and returns a handle.
    pub fn new(
        source: CandidateSource,
        set: SharedIdentifierSet,
        oracle: Arc<dyn UniquenessOracle>,
        emitter: Arc<dyn CaptureEventEmitter>,
        cancel: CancellationToken,
        buffer: usize,
    ) -> (Self, CaptureSessionHandle) {
        let (submit_tx, submit_rx) = mpsc::channel(buffer.max(1));

        let session = CaptureSession {
            source,
            set,
            oracle,
            emitter,
            submit_rx,
            cancel: cancel.clone(),
        };

        let handle = CaptureSessionHandle {
            source,
            submit_tx,
            cancel,
        };

        (session, handle)
    }

    /// Runs the session loop until cancellation.
    pub async fn run(mut self) {
        debug!(source = %self.source, "Capture session starting");

        'idle: loop {
            // Idle: wait for the next candidate (or teardown).
            let mut current = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break 'idle,
                maybe = self.submit_rx.recv() => match maybe {
                    Some(raw) => raw,
                    None => break 'idle,
                },
            };

            'candidate: loop {
                // Anything that queued up behind the current candidate
                // supersedes it; only the newest survives.
                while let Ok(newer) = self.submit_rx.try_recv() {
                    debug!(
                        source = %self.source,
                        superseded = %current,
                        "Superseding queued candidate"
                    );
                    current = newer;
                }

                let attempt = current.clone();
                tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break 'idle,
                    outcome = validate_candidate(
                        &attempt,
                        &self.set,
                        self.oracle.as_ref(),
                        &self.cancel,
                    ) => {
                        match outcome {
                            Some(verdict) => {
                                debug!(
                                    source = %self.source,
                                    candidate = verdict.candidate(),
                                    accepted = verdict.is_accepted(),
                                    "Validation complete"
                                );
                                self.emitter.emit_verdict(self.source, &verdict);
                            }
                            // Cancelled between the registry round trip and
                            // the terminal add: swallow, stop.
                            None => break 'idle,
                        }
                        break 'candidate;
                    }
                    maybe = self.submit_rx.recv() => match maybe {
                        Some(newer) => {
                            debug!(
                                source = %self.source,
                                superseded = %attempt,
                                "Superseding in-flight candidate"
                            );
                            current = newer;
                            continue 'candidate;
                        }
                        None => break 'idle,
                    },
                }
            }
        }

        info!(source = %self.source, "Capture session stopped");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_silent, next_event, ChannelEmitter, EmittedEvent, MockOracle};
    use intake_core::{Identifier, ValidationVerdict};
    use std::time::Duration;

    fn id(raw: &str) -> Identifier {
        Identifier::parse(raw).unwrap()
    }

    fn spawn_session(
        oracle: Arc<MockOracle>,
    ) -> (
        CaptureSessionHandle,
        tokio::sync::mpsc::UnboundedReceiver<EmittedEvent>,
        SharedIdentifierSet,
        tokio::task::JoinHandle<()>,
    ) {
        let set = SharedIdentifierSet::default();
        let (emitter, events) = ChannelEmitter::new();
        let (session, handle) = CaptureSession::new(
            CandidateSource::Manual,
            set.clone(),
            oracle,
            emitter,
            CancellationToken::new(),
            16,
        );
        let task = tokio::spawn(session.run());
        (handle, events, set, task)
    }

    #[tokio::test]
    async fn test_verdicts_arrive_in_submission_order() {
        let (handle, mut events, set, _task) = spawn_session(MockOracle::new());

        handle.submit("A123").await.unwrap();
        assert_eq!(
            next_event(&mut events).await,
            EmittedEvent::Verdict(
                CandidateSource::Manual,
                ValidationVerdict::Accepted {
                    identifier: id("A123")
                }
            )
        );

        handle.submit("B777").await.unwrap();
        assert_eq!(
            next_event(&mut events).await,
            EmittedEvent::Verdict(
                CandidateSource::Manual,
                ValidationVerdict::Accepted {
                    identifier: id("B777")
                }
            )
        );

        assert_eq!(set.snapshot(), vec![id("A123"), id("B777")]);
    }

    #[tokio::test]
    async fn test_newer_submission_supersedes_in_flight() {
        let oracle = MockOracle::new();
        let gate = oracle.hold();
        let (handle, mut events, set, _task) = spawn_session(Arc::clone(&oracle));

        // "A123" starts validating and parks on the registry lookup.
        handle.submit("A123").await.unwrap();
        oracle.wait_for_lookup("A123").await;

        // "B777" arrives before the lookup resolves: the stale candidate
        // is abandoned without a verdict. Permits are only released once
        // the replacement lookup is in flight.
        handle.submit("B777").await.unwrap();
        oracle.wait_for_lookup("B777").await;
        gate.add_permits(2);

        assert_eq!(
            next_event(&mut events).await,
            EmittedEvent::Verdict(
                CandidateSource::Manual,
                ValidationVerdict::Accepted {
                    identifier: id("B777")
                }
            )
        );
        assert_silent(&mut events, Duration::from_millis(50)).await;
        assert_eq!(set.snapshot(), vec![id("B777")]);
    }

    #[tokio::test]
    async fn test_queued_candidates_drain_to_newest() {
        let oracle = MockOracle::new();
        let gate = oracle.hold();
        let (handle, mut events, set, _task) = spawn_session(Arc::clone(&oracle));

        handle.submit("STALE-0").await.unwrap();
        oracle.wait_for_lookup("STALE-0").await;

        // Two more pile up while the first lookup is held; only the newest
        // ever completes validation.
        handle.submit("STALE-1").await.unwrap();
        handle.submit("FRESH-2").await.unwrap();
        oracle.wait_for_lookup("FRESH-2").await;
        gate.add_permits(4);

        assert_eq!(
            next_event(&mut events).await,
            EmittedEvent::Verdict(
                CandidateSource::Manual,
                ValidationVerdict::Accepted {
                    identifier: id("FRESH-2")
                }
            )
        );
        assert_silent(&mut events, Duration::from_millis(50)).await;
        assert_eq!(set.snapshot(), vec![id("FRESH-2")]);
    }

    #[tokio::test]
    async fn test_cancel_discards_in_flight_work() {
        let oracle = MockOracle::new();
        let gate = oracle.hold();
        let (handle, mut events, set, task) = spawn_session(Arc::clone(&oracle));

        handle.submit("A123").await.unwrap();
        oracle.wait_for_calls(1).await;

        // Cancel mid-lookup, then let the lookup resolve "unique": the
        // result must be swallowed, not applied.
        handle.cancel();
        gate.add_permits(1);
        task.await.unwrap();

        assert_silent(&mut events, Duration::from_millis(50)).await;
        assert!(set.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_submit_after_cancel_reports_shutdown() {
        let (handle, _events, _set, task) = spawn_session(MockOracle::new());

        handle.cancel();
        task.await.unwrap();

        let err = handle.submit("A123").await.unwrap_err();
        assert!(err.is_shutdown());
    }
}
