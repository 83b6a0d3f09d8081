//! DTMF detector adapter contract

use super::{ListenerToken, MediaError};
use std::sync::Arc;

/// A detected DTMF tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DtmfEvent {
    pub tone: char,
}

/// Receives tone events while the detector is active.
pub trait DtmfDetectorListener: Send + Sync {
    fn process(&self, event: DtmfEvent);
}

/// Capability to detect DTMF tones on the media stream.
pub trait DtmfDetector: Send + Sync {
    /// Start tone detection.
    fn activate(&self);

    /// Stop tone detection. Idempotent.
    fn deactivate(&self);

    /// Bind the listener for this activation cycle. At most one listener may
    /// be bound at a time.
    fn add_listener(
        &self,
        listener: Arc<dyn DtmfDetectorListener>,
    ) -> Result<ListenerToken, MediaError>;

    /// Revoke a registration. Unknown tokens are ignored.
    fn remove_listener(&self, token: ListenerToken);
}
