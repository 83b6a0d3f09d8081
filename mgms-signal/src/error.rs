//! Error types for mgms-signal

use thiserror::Error;

/// Errors raised while constructing or configuring a signal.
///
/// These are configuration errors: they surface immediately and the
/// operation never starts. Runtime media failures are not errors — they are
/// translated into a terminal outcome with a specific return code.
#[derive(Error, Debug)]
pub enum SignalError {
    /// A parameter symbol the signal does not support
    #[error("Unsupported parameter: {0}")]
    UnsupportedParameter(String),

    /// A parameter with a malformed value
    #[error("Invalid value '{value}' for parameter {name}")]
    InvalidParameter { name: String, value: String },

    /// Lookup of an ASR driver name that was never registered
    #[error("ASR driver '{0}' is not registered")]
    DriverNotRegistered(String),

    /// ASR engine used before a driver was configured
    #[error("ASR engine is not configured")]
    EngineNotConfigured,

    /// Shared configuration error
    #[error(transparent)]
    Common(#[from] mgms_common::Error),
}

/// Convenience result type for signal construction.
pub type Result<T> = std::result::Result<T, SignalError>;
