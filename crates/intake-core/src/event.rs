//! # Candidate Events & Validation Verdicts
//!
//! UI-facing DTOs for the capture pipeline.
//!
//! ## Event Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Candidate Event Flow                               │
//! │                                                                         │
//! │  SOURCES                                                                │
//! │  ───────                                                                │
//! │  Manual field ─────► CandidateEvent { source: Manual,  1 payload }      │
//! │  Camera frame ─────► CandidateEvent { source: Vision,  0..n payloads }  │
//! │  Companion scanner ► CandidateEvent { source: RemoteMailbox, 1 payload }│
//! │                                                                         │
//! │  VERDICTS (exactly one per submitted, non-superseded candidate)         │
//! │  ────────                                                               │
//! │  Accepted                ─► confirmation chime, row appears             │
//! │  RejectedLocalDuplicate  ─► "already on this product" warning           │
//! │  RejectedRemoteDuplicate ─► "already in inventory" warning              │
//! │  RejectedError           ─► error toast, operator retries manually      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Verdicts are serialized as tagged JSON using serde's adjacently tagged
//! enum, matching what the frontend event bridge expects:
//! ```json
//! { "type": "Accepted", "payload": { "identifier": "356938035643809" } }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::identifier::Identifier;

// =============================================================================
// Candidate Source
// =============================================================================

/// The input channel a candidate arrived from.
///
/// Each source validates independently; two candidates from the *same*
/// source are validated one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum CandidateSource {
    /// Operator typed the identifier into the text field.
    Manual,

    /// Live camera barcode scanner. The only source that may carry more
    /// than one candidate per event (multiple barcodes in one frame).
    Vision,

    /// Companion physical scanner pushing through the shared mailbox.
    RemoteMailbox,
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateSource::Manual => write!(f, "manual"),
            CandidateSource::Vision => write!(f, "vision"),
            CandidateSource::RemoteMailbox => write!(f, "remote-mailbox"),
        }
    }
}

// =============================================================================
// Candidate Event
// =============================================================================

/// One or more raw candidate strings arriving from a source.
///
/// Payloads are raw: not yet trimmed, deduplicated, or validated. The
/// timestamp records arrival at the engine boundary, for log correlation.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEvent {
    /// Where the candidate came from.
    pub source: CandidateSource,

    /// Raw candidate strings. Only [`CandidateSource::Vision`] may carry
    /// more than one.
    pub payloads: Vec<String>,

    /// When the event reached the engine.
    #[ts(as = "String")]
    pub received_at: DateTime<Utc>,
}

impl CandidateEvent {
    /// Creates an event timestamped now.
    pub fn now(source: CandidateSource, payloads: Vec<String>) -> Self {
        CandidateEvent {
            source,
            payloads,
            received_at: Utc::now(),
        }
    }

    /// Creates a single-payload event timestamped now.
    pub fn single(source: CandidateSource, payload: impl Into<String>) -> Self {
        Self::now(source, vec![payload.into()])
    }
}

// =============================================================================
// Validation Verdict
// =============================================================================

/// The outcome of validating one submitted candidate.
///
/// Emitted exactly once per submitted candidate, except candidates that
/// were superseded by a newer submission or discarded by session
/// cancellation - those produce no verdict at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "payload")]
pub enum ValidationVerdict {
    /// The candidate was unique everywhere and is now in the set.
    ///
    /// The identifier is *already added* when this verdict is emitted;
    /// callers must not add it again.
    Accepted { identifier: Identifier },

    /// The candidate is already in this product's identifier set.
    /// Resolved without any remote lookup.
    RejectedLocalDuplicate { candidate: Identifier },

    /// The remote registry already holds this identifier on another product.
    RejectedRemoteDuplicate { candidate: Identifier },

    /// The candidate could not be validated (empty input, registry
    /// unavailable). Never auto-retried; retry is a fresh user action.
    RejectedError { candidate: String, message: String },
}

impl ValidationVerdict {
    /// Returns true if the candidate was accepted into the set.
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationVerdict::Accepted { .. })
    }

    /// Returns the candidate string this verdict is about.
    pub fn candidate(&self) -> &str {
        match self {
            ValidationVerdict::Accepted { identifier } => identifier.as_str(),
            ValidationVerdict::RejectedLocalDuplicate { candidate } => candidate.as_str(),
            ValidationVerdict::RejectedRemoteDuplicate { candidate } => candidate.as_str(),
            ValidationVerdict::RejectedError { candidate, .. } => candidate,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
