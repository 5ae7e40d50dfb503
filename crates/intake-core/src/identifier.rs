//! # Identifier Module
//!
//! Provides the `Identifier` type for device identifiers (IMEI / serial).
//!
//! ## Why an Opaque Token?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  IDENTIFIERS ARE NOT PARSED                                             │
//! │                                                                         │
//! │  An IMEI looks numeric, a serial number does not. Carriers and OEMs    │
//! │  disagree on length, checksums, and casing. The intake flow therefore  │
//! │  treats identifiers as opaque tokens:                                   │
//! │                                                                         │
//! │    " 356938035643809 "  ──trim──►  "356938035643809"                   │
//! │                                                                         │
//! │  • Trimmed exactly once, at this boundary                               │
//! │  • Compared byte-exactly and case-sensitively everywhere after          │
//! │  • Never checksum-validated (no Luhn) - the registry is the arbiter    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use intake_core::Identifier;
//!
//! let imei = Identifier::parse("  356938035643809  ").unwrap();
//! assert_eq!(imei.as_str(), "356938035643809");
//!
//! // Empty candidates are rejected at the boundary
//! assert!(Identifier::parse("   ").is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::CandidateError;

// =============================================================================
// Identifier Type
// =============================================================================

/// A device identifier (IMEI or serial number) as an opaque token.
///
/// ## Design Decisions
/// - **Single field tuple struct**: zero-cost abstraction over String
/// - **Invariant**: the inner string is trimmed and non-empty; the only
///   constructor is [`Identifier::parse`], which enforces both
/// - **Byte-exact comparison**: derived `PartialEq`/`Hash` compare the raw
///   bytes; `ABC123` and `abc123` are different identifiers
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identifier(String);

impl Identifier {
    /// Parses a raw candidate string into an identifier token.
    ///
    /// Trims surrounding whitespace and rejects candidates that are empty
    /// afterwards. No other normalization is applied.
    ///
    /// ## Example
    /// ```rust
    /// use intake_core::Identifier;
    ///
    /// assert!(Identifier::parse("F17GH0XYZ").is_ok());
    /// assert!(Identifier::parse("").is_err());
    /// assert!(Identifier::parse(" \t ").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CandidateError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CandidateError::Empty);
        }
        Ok(Identifier(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner string.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
