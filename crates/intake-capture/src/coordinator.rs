//! # Resolution Coordinator
//!
//! Top-level orchestrator for identifier capture. Fans in candidates from
//! all active sources, arbitrates multi-candidate camera frames, and owns
//! the per-dialog identifier set.
//!
//! ## Coordinator Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  ResolutionCoordinator Architecture                     │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    ResolutionCoordinator                         │  │
//! │  │                                                                  │  │
//! │  │  • Owns one CaptureSession per source                            │  │
//! │  │  • Arbitrates multi-candidate camera frames                      │  │
//! │  │  • Exclusively owns the identifier set (UI sees snapshots only)  │  │
//! │  │  • Emits verdicts / choice requests to the UI layer              │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ Manual session │  │ Vision session │  │ Mailbox session        │    │
//! │  │                │  │                │  │   ▲                    │    │
//! │  │ Text field     │  │ Camera frames, │  │   │ RemoteMailbox-     │    │
//! │  │ submissions    │  │ one at a time  │  │   │ Watcher forwards   │    │
//! │  │                │  │ after choice   │  │   │ companion pushes   │    │
//! │  └────────────────┘  └────────────────┘  └────────────────────────┘    │
//! │                                                                         │
//! │  AMBIGUITY STATES                                                      │
//! │  ────────────────                                                      │
//! │  Ready ──(multi-candidate frame)──► AwaitingUserChoice                 │
//! │  AwaitingUserChoice ──(choose / cancel / newer frame)──► Ready         │
//! │                                                                         │
//! │  While awaiting a choice, events from OTHER sources route normally;    │
//! │  ambiguity resolution never blocks unrelated sources.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use intake_core::{CandidateEvent, CandidateSource, Identifier, IdentifierSet};

use crate::config::CaptureConfig;
use crate::emitter::{CaptureEventEmitter, NoOpEmitter};
use crate::error::{CaptureError, CaptureResult};
use crate::mailbox::{RemoteMailboxWatcher, SignalStore};
use crate::oracle::UniquenessOracle;
use crate::session::{CaptureSession, CaptureSessionHandle};
use crate::shared::SharedIdentifierSet;

// =============================================================================
// Resolution Coordinator
// =============================================================================

/// Per-dialog capture orchestrator.
///
/// Created when the product dialog opens, shut down when it closes. The
/// host holds it (typically behind an `Arc`) and calls the submit/choose/
/// delete operations from its UI commands; verdicts flow back through the
/// injected [`CaptureEventEmitter`].
pub struct ResolutionCoordinator {
    /// Correlation ID for this dialog's capture lifetime (logging only).
    session_id: Uuid,

    /// The per-dialog identifier set. Exclusively owned here; the UI only
    /// ever sees snapshots.
    set: SharedIdentifierSet,

    /// Event sink for the UI layer.
    emitter: Arc<dyn CaptureEventEmitter>,

    /// Manual text-field session.
    manual: CaptureSessionHandle,

    /// Camera scanner session.
    vision: CaptureSessionHandle,

    /// Companion-scanner session (fed by the mailbox watcher).
    mailbox: CaptureSessionHandle,

    /// Distinct candidates of the pending multi-candidate frame, if any.
    pending_choices: Mutex<Option<Vec<String>>>,

    /// Root cancellation token; children are held by sessions and watcher.
    cancel: CancellationToken,
}

impl ResolutionCoordinator {
    /// Starts building a coordinator. The oracle is the only required
    /// collaborator.
    pub fn builder(oracle: Arc<dyn UniquenessOracle>) -> ResolutionCoordinatorBuilder {
        ResolutionCoordinatorBuilder::new(oracle)
    }

    /// The correlation ID for this capture lifetime.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Submits the manual text-field value for validation.
    pub async fn submit_manual(&self, raw: impl Into<String>) -> CaptureResult<()> {
        self.ensure_live()?;
        let event = CandidateEvent::single(CandidateSource::Manual, raw.into());
        debug!(
            session_id = %self.session_id,
            source = %event.source,
            "Candidate event received"
        );
        // Single-payload by construction.
        let payload = event.payloads.into_iter().next().unwrap_or_default();
        self.manual.submit(payload).await
    }

    /// Submits the candidate strings decoded from one camera frame.
    ///
    /// Payloads are trimmed, empties dropped, and duplicates within the
    /// frame collapsed. A frame with one distinct candidate validates
    /// immediately; a frame with several enters the awaiting-choice state
    /// (replacing any previous pending frame - latest frame wins).
    pub async fn submit_vision_frame(&self, payloads: Vec<String>) -> CaptureResult<()> {
        self.ensure_live()?;
        let event = CandidateEvent::now(CandidateSource::Vision, payloads);
        debug!(
            session_id = %self.session_id,
            source = %event.source,
            payloads = event.payloads.len(),
            "Candidate event received"
        );

        let mut distinct: Vec<String> = Vec::new();
        for payload in &event.payloads {
            let trimmed = payload.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !distinct.iter().any(|seen| seen == trimmed) {
                distinct.push(trimmed.to_string());
            }
        }

        match distinct.len() {
            0 => {
                debug!(session_id = %self.session_id, "Vision frame carried no usable candidates");
                Ok(())
            }
            1 => {
                let only = distinct.remove(0);
                self.vision.submit(only).await
            }
            _ => {
                info!(
                    session_id = %self.session_id,
                    candidates = distinct.len(),
                    "Multiple candidates in frame, awaiting operator choice"
                );
                {
                    let mut pending = self
                        .pending_choices
                        .lock()
                        .expect("pending choices mutex poisoned");
                    *pending = Some(distinct.clone());
                }
                self.emitter.emit_choice_request(&distinct);
                Ok(())
            }
        }
    }

    /// Resolves a pending multi-candidate frame with the operator's pick.
    ///
    /// Exactly one submission reaches the vision session. The pick must be
    /// one of the pending candidates; on a mismatch the pending set is left
    /// intact so the operator can pick again.
    pub async fn choose_candidate(&self, candidate: &str) -> CaptureResult<()> {
        self.ensure_live()?;
        let chosen = {
            let mut pending = self
                .pending_choices
                .lock()
                .expect("pending choices mutex poisoned");
            let Some(choices) = pending.as_ref() else {
                return Err(CaptureError::NoPendingChoice);
            };
            let Some(found) = choices.iter().find(|choice| choice.as_str() == candidate) else {
                return Err(CaptureError::UnknownChoice {
                    candidate: candidate.to_string(),
                });
            };
            let found = found.clone();
            *pending = None;
            found
        };

        info!(session_id = %self.session_id, candidate = %chosen, "Operator chose candidate");
        self.vision.submit(chosen).await
    }

    /// Dismisses the pending multi-candidate frame without validating
    /// anything. No-op when nothing is pending.
    pub fn cancel_choice(&self) {
        let dismissed = self
            .pending_choices
            .lock()
            .expect("pending choices mutex poisoned")
            .take();
        if dismissed.is_some() {
            debug!(session_id = %self.session_id, "Pending choice dismissed");
        }
    }

    /// The distinct candidates awaiting an operator choice, if any.
    pub fn pending_choices(&self) -> Option<Vec<String>> {
        self.pending_choices
            .lock()
            .expect("pending choices mutex poisoned")
            .clone()
    }

    /// Deletes an identifier at the operator's request.
    pub fn delete_identifier(&self, raw: &str) -> CaptureResult<()> {
        self.ensure_live()?;
        let identifier = Identifier::parse(raw)?;
        self.set.with_mut(|set| set.remove(&identifier))?;

        info!(session_id = %self.session_id, identifier = %identifier, "Identifier deleted");
        self.emitter.emit_identifier_removed(&identifier);
        Ok(())
    }

    /// Read-only copy of the identifier set in entry order.
    ///
    /// This is also the commit-time handoff: the product save flow reads
    /// the snapshot and folds it into the record.
    pub fn snapshot(&self) -> Vec<Identifier> {
        self.set.snapshot()
    }

    /// Tears down every session and the mailbox watcher.
    ///
    /// In-flight registry lookups are left to complete, but their results
    /// are discarded: no set mutation, no UI event. Idempotent; call from
    /// dialog close regardless of in-flight work.
    pub fn shutdown(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        info!(session_id = %self.session_id, "Capture coordinator shutting down");
        self.cancel_choice();

        // Fan out to every session, then the root token (the mailbox
        // watcher holds a child of it).
        self.manual.cancel();
        self.vision.cancel();
        self.mailbox.cancel();
        self.cancel.cancel();
    }

    /// Returns true once `shutdown` has been called.
    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn ensure_live(&self) -> CaptureResult<()> {
        if self.cancel.is_cancelled() {
            return Err(CaptureError::ShuttingDown);
        }
        Ok(())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`ResolutionCoordinator`].
///
/// Building spawns the per-source session tasks (and the mailbox watcher
/// when a mailbox source is attached), so a tokio runtime must be current.
pub struct ResolutionCoordinatorBuilder {
    config: CaptureConfig,
    oracle: Arc<dyn UniquenessOracle>,
    emitter: Option<Arc<dyn CaptureEventEmitter>>,
    initial: Vec<Identifier>,
    mailbox_source: Option<(mpsc::Receiver<String>, Arc<dyn SignalStore>)>,
}

impl ResolutionCoordinatorBuilder {
    /// Creates a builder with the given registry oracle.
    pub fn new(oracle: Arc<dyn UniquenessOracle>) -> Self {
        ResolutionCoordinatorBuilder {
            config: CaptureConfig::default(),
            oracle,
            emitter: None,
            initial: Vec::new(),
            mailbox_source: None,
        }
    }

    /// Overrides the default configuration.
    pub fn with_config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the UI event sink. Defaults to [`NoOpEmitter`].
    pub fn with_emitter(mut self, emitter: Arc<dyn CaptureEventEmitter>) -> Self {
        self.emitter = Some(emitter);
        self
    }

    /// Pre-populates the set from an existing product's stored identifiers
    /// (edit flow). Stored duplicates are silently dropped.
    pub fn with_initial_identifiers<I>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = Identifier>,
    {
        self.initial = identifiers.into_iter().collect();
        self
    }

    /// Attaches the companion-scanner mailbox: a channel of pushed signal
    /// values plus the store used to clear each consumed signal.
    pub fn with_mailbox(
        mut self,
        signal_rx: mpsc::Receiver<String>,
        store: Arc<dyn SignalStore>,
    ) -> Self {
        self.mailbox_source = Some((signal_rx, store));
        self
    }

    /// Builds the coordinator and spawns its background tasks.
    pub fn build(self) -> ResolutionCoordinator {
        let session_id = Uuid::new_v4();
        let emitter = self.emitter.unwrap_or_else(|| Arc::new(NoOpEmitter));
        let set = SharedIdentifierSet::new(IdentifierSet::with_identifiers(self.initial));
        let cancel = CancellationToken::new();

        let spawn_session = |source: CandidateSource| {
            let (session, handle) = CaptureSession::new(
                source,
                set.clone(),
                Arc::clone(&self.oracle),
                Arc::clone(&emitter),
                cancel.child_token(),
                self.config.submit_buffer,
            );
            tokio::spawn(session.run());
            handle
        };

        let manual = spawn_session(CandidateSource::Manual);
        let vision = spawn_session(CandidateSource::Vision);
        let mailbox = spawn_session(CandidateSource::RemoteMailbox);

        if let Some((signal_rx, store)) = self.mailbox_source {
            if self.config.enable_mailbox {
                let watcher =
                    RemoteMailboxWatcher::new(signal_rx, store, mailbox.clone(), cancel.child_token());
                tokio::spawn(watcher.run());
            } else {
                info!(session_id = %session_id, "Mailbox source attached but disabled by config");
            }
        }

        info!(session_id = %session_id, "Capture coordinator started");

        ResolutionCoordinator {
            session_id,
            set,
            emitter,
            manual,
            vision,
            mailbox,
            pending_choices: Mutex::new(None),
            cancel,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
