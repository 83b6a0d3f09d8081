//! Recognition driver contract

use std::collections::BTreeMap;
use std::sync::Arc;

/// Error kinds reported by a recognition driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsrDriverError {
    UnexpectedError,
}

impl std::fmt::Display for AsrDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsrDriverError::UnexpectedError => write!(f, "UNEXPECTED_ERROR"),
        }
    }
}

/// Receives recognition results and errors from a driver.
pub trait AsrDriverEventListener: Send + Sync {
    fn on_speech_recognized(&self, text: &str);
    fn on_error(&self, error: AsrDriverError, description: &str);
}

/// A pluggable speech-recognition backend.
///
/// The core feeds raw audio through `write` while collection is active; the
/// driver raises one recognized-text event per utterance on its listener.
pub trait AsrDriver: Send + Sync {
    /// Apply driver-specific parameters from the server configuration.
    fn configure(&self, params: &BTreeMap<String, String>);

    /// Begin a recognition session in the given language.
    fn start_recognizing(&self, language: &str);

    /// Feed a chunk of raw audio into the current session.
    fn write(&self, data: &[u8]);

    /// End the current recognition session.
    fn finish_recognizing(&self);

    /// Bind or unbind the event listener.
    fn set_listener(&self, listener: Option<Arc<dyn AsrDriverEventListener>>);
}

impl std::fmt::Debug for dyn AsrDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AsrDriver")
    }
}
