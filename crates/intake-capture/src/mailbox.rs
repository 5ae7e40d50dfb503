//! # Remote Mailbox Watcher
//!
//! Adapter for the companion physical scanner. The scanner writes each
//! decoded identifier into a shared mailbox (a listened document/key); the
//! host application's transport turns those writes into a channel of
//! pushed values, and this watcher turns each pushed value into exactly
//! one candidate submission.
//!
//! ## Signal Handling
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Mailbox Signal Flow                                  │
//! │                                                                         │
//! │  Companion scanner ──writes──► shared mailbox ──push──► signal channel │
//! │                                                              │          │
//! │                                                              ▼          │
//! │  1. Empty / whitespace value? ─────► ignore (mailbox was cleared)       │
//! │  2. Forward ONE candidate to the RemoteMailbox capture session          │
//! │  3. Best-effort clear of the consumed signal                            │
//! │     └── clear failure is logged, never escalated, never blocks (2)      │
//! │                                                                         │
//! │  DUPLICATE PUSHES                                                      │
//! │  ────────────────                                                      │
//! │  The watcher does no dedup of its own. A re-pushed value lands in      │
//! │  the session, where superseding and the set's containment check        │
//! │  already make redelivery harmless.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::MailboxError;
use crate::session::CaptureSessionHandle;

// =============================================================================
// Signal Store Trait
// =============================================================================

/// Clear operation on the shared mailbox (implemented by the host over its
/// document store).
#[async_trait]
pub trait SignalStore: Send + Sync {
    /// Clears the consumed signal value so it is not redelivered.
    /// Best-effort: failures are logged by the watcher, not escalated.
    async fn clear(&self, value: &str) -> Result<(), MailboxError>;
}

// =============================================================================
// Remote Mailbox Watcher
// =============================================================================

/// Watches the pushed-signal channel and forwards candidates to the
/// RemoteMailbox capture session.
pub struct RemoteMailboxWatcher {
    /// Pushed mailbox values from the host transport.
    signal_rx: mpsc::Receiver<String>,

    /// Clear operation for consumed signals.
    store: Arc<dyn SignalStore>,

    /// The RemoteMailbox capture session.
    session: CaptureSessionHandle,

    /// Watcher cancellation token (child of the coordinator's root token).
    cancel: CancellationToken,
}

impl RemoteMailboxWatcher {
    /// Creates a watcher. Spawn [`run`](Self::run) to start it.
    pub fn new(
        signal_rx: mpsc::Receiver<String>,
        store: Arc<dyn SignalStore>,
        session: CaptureSessionHandle,
        cancel: CancellationToken,
    ) -> Self {
        RemoteMailboxWatcher {
            signal_rx,
            store,
            session,
            cancel,
        }
    }

    /// Runs the watcher loop until cancellation.
    pub async fn run(mut self) {
        debug!("Mailbox watcher starting");

        loop {
            let value = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                maybe = self.signal_rx.recv() => match maybe {
                    Some(value) => value,
                    None => break,
                },
            };

            // An empty write is the mailbox's own cleared state, not a scan.
            if value.trim().is_empty() {
                debug!("Ignoring empty mailbox signal");
                continue;
            }

            debug!(value = %value, "Mailbox signal received");
            if self.session.submit(value.clone()).await.is_err() {
                // Session torn down; the engine is shutting down with us.
                break;
            }

            // The candidate is already forwarded; clearing only prevents
            // redelivery of the same mailbox write.
            if let Err(err) = self.store.clear(&value).await {
                warn!(value = %value, %err, "Failed to clear consumed mailbox signal");
            }
        }

        info!("Mailbox watcher stopped");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
