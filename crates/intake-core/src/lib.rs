//! # intake-core: Pure Business Logic for the Intake Capture Engine
//!
//! This crate is the **heart** of identifier intake. It contains the device
//! identifier model and its uniqueness invariants as pure types with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Intake Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host Application (dialog UI)                    │   │
//! │  │   Manual field ──► Camera scanner ──► Companion scanner         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              intake-capture (async engine)                      │   │
//! │  │   Sessions ──► Validator ──► Coordinator ──► Mailbox watcher    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ intake-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌───────────────┐  ┌─────────┐  ┌─────────┐  │   │
//! │  │   │ identifier │  │identifier_set │  │  event  │  │  error  │  │   │
//! │  │   │ Identifier │  │ IdentifierSet │  │ Verdict │  │SetError │  │   │
//! │  │   └────────────┘  └───────────────┘  └─────────┘  └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE TYPES                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`identifier`] - The opaque device identifier token (IMEI/serial)
//! - [`identifier_set`] - Ordered, unique, per-edit-session collection
//! - [`event`] - Candidate events and validation verdicts (UI-facing DTOs)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every operation is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Opaque Tokens**: Identifiers are compared byte-exactly, never normalized
//!    beyond a single trim at the boundary
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use intake_core::{Identifier, IdentifierSet};
//!
//! let mut set = IdentifierSet::new();
//! let imei = Identifier::parse(" 356938035643809 ").unwrap();
//!
//! set.add(imei.clone()).unwrap();
//! assert!(set.contains(&imei));
//! assert!(set.add(imei).is_err()); // duplicates never enter the set
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod event;
pub mod identifier;
pub mod identifier_set;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use intake_core::Identifier` instead of
// `use intake_core::identifier::Identifier`

pub use error::{CandidateError, CoreResult, SetError};
pub use event::{CandidateEvent, CandidateSource, ValidationVerdict};
pub use identifier::Identifier;
pub use identifier_set::IdentifierSet;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum identifiers allowed on a single product.
///
/// ## Business Reason
/// Products are entered per physical unit or small batch; a runaway scanner
/// should not be able to attach hundreds of identifiers to one record.
/// Can be made configurable per-tenant in future versions.
pub const MAX_IDENTIFIERS_PER_PRODUCT: usize = 200;
