//! # intake-capture: Identifier Capture & Deduplication Engine
//!
//! This crate turns raw IMEI/serial candidates from three concurrently
//! active sources into validated, unique entries in the product's
//! identifier set.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Capture Engine Architecture                         │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │              ResolutionCoordinator (Main Orchestrator)           │  │
//! │  │                                                                  │  │
//! │  │  Created when the product dialog opens                           │  │
//! │  │  Fans in candidates, arbitrates multi-candidate frames           │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ CaptureSession │  │ CaptureSession │  │ CaptureSession         │    │
//! │  │ (Manual)       │  │ (Vision)       │  │ (RemoteMailbox)        │    │
//! │  │                │  │                │  │          ▲             │    │
//! │  │ One validation │  │ Newest frame   │  │          │             │    │
//! │  │ in flight,     │  │ wins, stale    │  │  RemoteMailboxWatcher  │    │
//! │  │ newest wins    │  │ frames dropped │  │  (companion scanner)   │    │
//! │  └────────┬───────┘  └────────┬───────┘  └──────────┬─────────────┘    │
//! │           │                   │                     │                   │
//! │           └───────────────────┼─────────────────────┘                   │
//! │                               ▼                                         │
//! │                  ┌─────────────────────────┐                            │
//! │                  │   validate_candidate    │                            │
//! │                  │                         │                            │
//! │                  │  local set ─► registry  │                            │
//! │                  │  ─► re-check & add      │                            │
//! │                  └─────────────────────────┘                            │
//! │                                                                         │
//! │  EVENTS (to the UI layer via CaptureEventEmitter):                     │
//! │  • Verdicts      - accepted / duplicate / error, one per candidate     │
//! │  • ChoiceRequest - several barcodes in one frame, operator must pick   │
//! │  • Removed       - operator deleted an identifier                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//!
//! - Each source validates independently; two candidates from the *same*
//!   source are serialized through that source's session
//! - Every mutation of the identifier set goes through
//!   [`SharedIdentifierSet`], whose lock is never held across an await, so
//!   the check-then-add in the validator is atomic against other sources
//! - The remote-registry lookup is the only suspension point
//! - Dialog teardown cancels one root token; sessions and the watcher hold
//!   child tokens, and in-flight results are discarded, never applied
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use intake_capture::{ResolutionCoordinator, UniquenessOracle};
//! # use intake_capture::OracleError;
//! # struct RegistryClient;
//! # #[async_trait::async_trait]
//! # impl UniquenessOracle for RegistryClient {
//! #     async fn exists_remotely(&self, _: &str) -> Result<bool, OracleError> { Ok(false) }
//! # }
//!
//! # async fn open_dialog() {
//! let oracle: Arc<dyn UniquenessOracle> = Arc::new(RegistryClient);
//! let coordinator = ResolutionCoordinator::builder(oracle).build();
//!
//! coordinator.submit_manual("356938035643809").await.unwrap();
//! coordinator
//!     .submit_vision_frame(vec!["X1".into(), "X2".into()])
//!     .await
//!     .unwrap();
//! coordinator.choose_candidate("X2").await.unwrap();
//!
//! let identifiers = coordinator.snapshot(); // folded into the saved record
//! coordinator.shutdown();                   // dialog closed
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod coordinator;
pub mod emitter;
pub mod error;
pub mod mailbox;
pub mod oracle;
pub mod session;
pub mod shared;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::CaptureConfig;
pub use coordinator::{ResolutionCoordinator, ResolutionCoordinatorBuilder};
pub use emitter::{CaptureEventEmitter, NoOpEmitter};
pub use error::{CaptureError, CaptureResult, MailboxError, OracleError};
pub use mailbox::{RemoteMailboxWatcher, SignalStore};
pub use oracle::UniquenessOracle;
pub use session::{CaptureSession, CaptureSessionHandle};
pub use shared::SharedIdentifierSet;
pub use validator::validate_candidate;
