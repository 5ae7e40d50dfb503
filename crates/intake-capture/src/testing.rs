//! Test support: a scriptable registry oracle and an event-collecting
//! emitter shared by the session, coordinator, and mailbox tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::Semaphore;

use intake_core::{CandidateSource, Identifier, ValidationVerdict};

use crate::emitter::CaptureEventEmitter;
use crate::error::{MailboxError, OracleError};
use crate::mailbox::SignalStore;
use crate::oracle::UniquenessOracle;

// =============================================================================
// Mock Oracle
// =============================================================================

/// In-memory registry with a call counter, scriptable failures, and an
/// optional gate that holds lookups in flight until the test releases them.
pub(crate) struct MockOracle {
    calls: AtomicUsize,
    lookups: Mutex<Vec<String>>,
    remote: Mutex<HashSet<String>>,
    failing: Mutex<HashSet<String>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockOracle {
    pub fn new() -> Arc<Self> {
        Arc::new(MockOracle {
            calls: AtomicUsize::new(0),
            lookups: Mutex::new(Vec::new()),
            remote: Mutex::new(HashSet::new()),
            failing: Mutex::new(HashSet::new()),
            gate: Mutex::new(None),
        })
    }

    /// Oracle that already holds the given identifiers remotely.
    pub fn with_remote(values: &[&str]) -> Arc<Self> {
        let oracle = Self::new();
        for value in values {
            oracle.remote.lock().unwrap().insert((*value).to_string());
        }
        oracle
    }

    /// Makes lookups for `value` fail with `OracleError::Unavailable`.
    pub fn mark_failing(&self, value: &str) {
        self.failing.lock().unwrap().insert(value.to_string());
    }

    pub fn clear_failing(&self, value: &str) {
        self.failing.lock().unwrap().remove(value);
    }

    /// Number of lookups performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Installs a gate: every subsequent lookup blocks until the test adds
    /// a permit to the returned semaphore. One permit releases one lookup.
    pub fn hold(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Waits until at least `n` lookups have started.
    pub async fn wait_for_calls(&self, n: usize) {
        while self.calls() < n {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Waits until a lookup for `value` has started (it may still be held
    /// by the gate).
    pub async fn wait_for_lookup(&self, value: &str) {
        loop {
            if self.lookups.lock().unwrap().iter().any(|seen| seen == value) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }
}

#[async_trait]
impl UniquenessOracle for MockOracle {
    async fn exists_remotely(&self, identifier: &str) -> Result<bool, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lookups.lock().unwrap().push(identifier.to_string());

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let permit = gate
                .acquire_owned()
                .await
                .map_err(|_| OracleError::Unavailable("gate closed".into()))?;
            permit.forget();
        }

        if self.failing.lock().unwrap().contains(identifier) {
            return Err(OracleError::Unavailable("registry offline".into()));
        }

        Ok(self.remote.lock().unwrap().contains(identifier))
    }
}

// =============================================================================
// Channel Emitter
// =============================================================================

/// Everything the engine can emit, flattened for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EmittedEvent {
    Verdict(CandidateSource, ValidationVerdict),
    ChoiceRequest(Vec<String>),
    Removed(Identifier),
}

/// Emitter that forwards every event into an unbounded channel.
pub(crate) struct ChannelEmitter {
    tx: mpsc::UnboundedSender<EmittedEvent>,
}

impl ChannelEmitter {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<EmittedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(ChannelEmitter { tx }), rx)
    }
}

impl CaptureEventEmitter for ChannelEmitter {
    fn emit_verdict(&self, source: CandidateSource, verdict: &ValidationVerdict) {
        let _ = self.tx.send(EmittedEvent::Verdict(source, verdict.clone()));
    }

    fn emit_choice_request(&self, candidates: &[String]) {
        let _ = self.tx.send(EmittedEvent::ChoiceRequest(candidates.to_vec()));
    }

    fn emit_identifier_removed(&self, identifier: &Identifier) {
        let _ = self.tx.send(EmittedEvent::Removed(identifier.clone()));
    }
}

/// Receives the next event, failing the test after a second of silence.
pub(crate) async fn next_event(rx: &mut mpsc::UnboundedReceiver<EmittedEvent>) -> EmittedEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for an engine event")
        .expect("event channel closed")
}

/// Asserts that no further event arrives within the given window.
pub(crate) async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<EmittedEvent>, window: Duration) {
    let outcome = tokio::time::timeout(window, rx.recv()).await;
    assert!(
        outcome.is_err(),
        "expected silence, got {:?}",
        outcome.unwrap()
    );
}

// =============================================================================
// Recording Signal Store
// =============================================================================

/// Signal store that records cleared values and can be told to fail.
pub(crate) struct RecordingSignalStore {
    cleared: Mutex<Vec<String>>,
    fail_clears: AtomicUsize,
}

impl RecordingSignalStore {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingSignalStore {
            cleared: Mutex::new(Vec::new()),
            fail_clears: AtomicUsize::new(0),
        })
    }

    /// Makes the next `n` clear calls fail.
    pub fn fail_next_clears(&self, n: usize) {
        self.fail_clears.store(n, Ordering::SeqCst);
    }

    pub fn cleared(&self) -> Vec<String> {
        self.cleared.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignalStore for RecordingSignalStore {
    async fn clear(&self, value: &str) -> Result<(), MailboxError> {
        let remaining = self.fail_clears.load(Ordering::SeqCst);
        if remaining > 0 {
            self.fail_clears.store(remaining - 1, Ordering::SeqCst);
            return Err(MailboxError::ClearFailed("permission denied".into()));
        }
        self.cleared.lock().unwrap().push(value.to_string());
        Ok(())
    }
}
