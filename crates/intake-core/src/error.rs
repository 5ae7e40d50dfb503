//! # Error Types
//!
//! Domain-specific error types for intake-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  intake-core errors (this file)                                         │
//! │  ├── CandidateError  - A raw candidate string cannot become a token     │
//! │  └── SetError        - Identifier set invariant violations              │
//! │                                                                         │
//! │  intake-capture errors (separate crate)                                 │
//! │  ├── CaptureError    - Engine lifecycle / choice arbitration failures   │
//! │  ├── OracleError     - Remote registry lookup failures                  │
//! │  └── MailboxError    - Companion-scanner signal failures                │
//! │                                                                         │
//! │  Flow: CandidateError / SetError → ValidationVerdict → UI toast         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (the offending identifier)
//! 3. Errors are enum variants, never String
//! 4. Duplicate and empty-candidate outcomes are routine, not faults - they
//!    surface to the UI as informational verdicts

use thiserror::Error;

use crate::identifier::Identifier;

// =============================================================================
// Candidate Error
// =============================================================================

/// Errors turning a raw candidate string into an identifier token.
///
/// Raised before any uniqueness checking happens. An empty candidate is an
/// expected, routine outcome (a blank manual field, optical noise), reported
/// to the operator as a verdict rather than thrown as a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CandidateError {
    /// The candidate is empty after trimming surrounding whitespace.
    #[error("candidate is empty")]
    Empty,
}

// =============================================================================
// Set Error
// =============================================================================

/// Identifier set invariant violations.
///
/// ## When These Occur
/// - `AlreadyPresent`: the validated-accept path lost a race and another
///   source inserted the same identifier first, or a caller retried an add
/// - `NotFound`: a user-initiated delete named an identifier that is not in
///   the set (stale UI row)
/// - `CapacityExceeded`: a runaway scanner tried to push the set past the
///   per-product cap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    /// The identifier is already in the set.
    #[error("identifier '{0}' is already present")]
    AlreadyPresent(Identifier),

    /// The identifier is not in the set.
    #[error("identifier '{0}' is not in the set")]
    NotFound(Identifier),

    /// The set has reached the per-product identifier cap.
    #[error("cannot hold more than {max} identifiers per product")]
    CapacityExceeded { max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with SetError.
pub type CoreResult<T> = Result<T, SetError>;

// =============================================================================
// Unit Tests
// =============================================================================
