//! # Capture Event Emitter
//!
//! Trait for publishing engine events to the UI layer (implemented by the
//! host application's event bridge).

use intake_core::{CandidateSource, Identifier, ValidationVerdict};

// =============================================================================
// Event Emitter Trait
// =============================================================================

/// Sink for user-visible capture events.
///
/// Implementations must be cheap and non-blocking; they are called from the
/// engine's async tasks. A typical implementation forwards onto the host's
/// IPC event channel.
pub trait CaptureEventEmitter: Send + Sync {
    /// A submitted candidate received its verdict.
    fn emit_verdict(&self, source: CandidateSource, verdict: &ValidationVerdict);

    /// A camera frame carried several distinct candidates; the operator
    /// must pick one. Replaces any previously presented choice set.
    fn emit_choice_request(&self, candidates: &[String]);

    /// The operator deleted an identifier from the set.
    fn emit_identifier_removed(&self, identifier: &Identifier);
}

/// No-op event emitter for tests and headless use.
pub struct NoOpEmitter;

impl CaptureEventEmitter for NoOpEmitter {
    fn emit_verdict(&self, _source: CandidateSource, _verdict: &ValidationVerdict) {}
    fn emit_choice_request(&self, _candidates: &[String]) {}
    fn emit_identifier_removed(&self, _identifier: &Identifier) {}
}
