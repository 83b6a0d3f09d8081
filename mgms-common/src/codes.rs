//! Signal return codes
//!
//! Outcome classifiers reported to the call-control layer when a signal
//! completes. Numeric values follow the RFC 2897 audio package event report
//! codes so they can be placed directly on the wire.

use serde::{Deserialize, Serialize};

/// Terminal outcome of a signal operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnCode {
    /// Operation completed successfully
    Success,
    /// Unspecified failure
    UnspecifiedFailure,
    /// An audio segment could not be loaded or played
    BadAudioId,
    /// No digits were collected before the operation ended
    NoDigits,
    /// Collected digits did not satisfy the digit pattern or minimum count
    DigitPatternNotMatched,
    /// The user ran out of retry attempts
    MaxAttemptsExceeded,
}

impl ReturnCode {
    /// Numeric event report code (RFC 2897 §4.3).
    pub fn code(&self) -> u16 {
        match self {
            ReturnCode::Success => 100,
            ReturnCode::UnspecifiedFailure => 300,
            ReturnCode::BadAudioId => 301,
            ReturnCode::NoDigits => 326,
            ReturnCode::DigitPatternNotMatched => 329,
            ReturnCode::MaxAttemptsExceeded => 330,
        }
    }

    /// Whether this code reports a successful operation.
    pub fn is_success(&self) -> bool {
        matches!(self, ReturnCode::Success)
    }
}
