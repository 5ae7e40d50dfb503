//! # Capture Configuration
//!
//! Tuning knobs for the capture engine. This crate performs no file I/O;
//! the host application embeds [`CaptureConfig`] in its own configuration
//! and passes it in at coordinator construction.

use serde::Deserialize;

// =============================================================================
// Capture Configuration
// =============================================================================

/// Configuration for one capture engine instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CaptureConfig {
    /// Buffer size of each per-source submission channel.
    ///
    /// Submissions beyond the buffer are still accepted eventually (senders
    /// await capacity); the buffer only bounds how many stale candidates
    /// can pile up before the session drains them to the newest.
    pub submit_buffer: usize,

    /// Whether the companion-scanner mailbox source is started at all.
    /// Hosts without a paired physical scanner leave this off.
    pub enable_mailbox: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            submit_buffer: 16,
            enable_mailbox: true,
        }
    }
}
