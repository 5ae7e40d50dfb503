//! # Capture Error Types
//!
//! Error types for the capture engine.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Capture Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Lifecycle     │  │  Choice         │  │   Boundary              │ │
//! │  │                 │  │  Arbitration    │  │                         │ │
//! │  │  ShuttingDown   │  │  NoPendingChoice│  │  OracleError            │ │
//! │  │  ChannelClosed  │  │  UnknownChoice  │  │  MailboxError           │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Duplicate / empty-candidate outcomes are NOT errors - they travel as  │
//! │  ValidationVerdict values. Only engine misuse and boundary failures    │
//! │  surface through this module.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use intake_core::{CandidateError, SetError};

/// Result type alias for capture operations.
pub type CaptureResult<T> = Result<T, CaptureError>;

// =============================================================================
// Capture Error
// =============================================================================

/// Capture engine error type.
///
/// ## Design Principles
/// - Each variant includes enough context for debugging
/// - Errors are categorized for different handling strategies
/// - All errors are `Send + Sync` for async compatibility
#[derive(Debug, Error)]
pub enum CaptureError {
    // =========================================================================
    // Lifecycle Errors
    // =========================================================================
    /// The engine has been shut down; no further candidates are accepted.
    #[error("capture engine is shutting down")]
    ShuttingDown,

    /// An internal channel closed unexpectedly.
    #[error("channel error: {0}")]
    ChannelClosed(String),

    // =========================================================================
    // Choice Arbitration Errors
    // =========================================================================
    /// `choose_candidate` was called with no multi-candidate frame pending.
    #[error("no candidate choice is pending")]
    NoPendingChoice,

    /// The chosen string is not one of the pending candidates.
    #[error("'{candidate}' is not one of the pending choices")]
    UnknownChoice { candidate: String },

    // =========================================================================
    // Candidate / Set Errors (user-initiated paths)
    // =========================================================================
    /// The raw string cannot become an identifier token.
    #[error("invalid candidate: {0}")]
    InvalidCandidate(#[from] CandidateError),

    /// An identifier set operation failed (delete of a missing entry).
    #[error(transparent)]
    Set(#[from] SetError),
}

impl CaptureError {
    /// Returns true if this error means the engine is torn down and the
    /// caller should stop submitting.
    pub fn is_shutdown(&self) -> bool {
        matches!(
            self,
            CaptureError::ShuttingDown | CaptureError::ChannelClosed(_)
        )
    }
}

// =============================================================================
// Oracle Error
// =============================================================================

/// Remote registry lookup failure.
///
/// The engine treats every oracle failure as fail-closed: the candidate is
/// rejected with an error verdict, never assumed unique. Retry policy, if
/// any, belongs to the oracle implementation.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    /// The registry backend could not be reached.
    #[error("registry unavailable: {0}")]
    Unavailable(String),

    /// The registry answered but the lookup itself failed.
    #[error("registry lookup failed: {0}")]
    LookupFailed(String),
}

// =============================================================================
// Mailbox Error
// =============================================================================

/// Companion-scanner mailbox failure.
#[derive(Debug, Clone, Error)]
pub enum MailboxError {
    /// Clearing the consumed signal failed. Best-effort only: the candidate
    /// is already forwarded by the time this can occur.
    #[error("failed to clear mailbox signal: {0}")]
    ClearFailed(String),
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_categorization() {
        assert!(CaptureError::ShuttingDown.is_shutdown());
        assert!(CaptureError::ChannelClosed("submit channel".into()).is_shutdown());

        assert!(!CaptureError::NoPendingChoice.is_shutdown());
        assert!(!CaptureError::UnknownChoice {
            candidate: "X9".into()
        }
        .is_shutdown());
    }

    #[test]
    fn test_error_display() {
        let err = CaptureError::UnknownChoice {
            candidate: "X9".into(),
        };
        assert_eq!(err.to_string(), "'X9' is not one of the pending choices");

        let err = OracleError::Unavailable("connection refused".into());
        assert_eq!(err.to_string(), "registry unavailable: connection refused");
    }

    #[test]
    fn test_candidate_error_converts() {
        let err: CaptureError = CandidateError::Empty.into();
        assert!(matches!(err, CaptureError::InvalidCandidate(_)));
    }
}
