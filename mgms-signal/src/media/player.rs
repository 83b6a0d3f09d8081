//! Audio player adapter contract

use super::{ListenerToken, MediaError};
use std::sync::Arc;
use std::time::Duration;

/// Events raised by the player while a segment is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The current segment finished playing
    Stop,
    /// Playback failed after activation
    Failed,
}

/// Receives player events. Implementations must be cheap and non-blocking;
/// events are funneled into the state machine's queue, never handled on the
/// adapter thread.
pub trait PlayerListener: Send + Sync {
    fn process(&self, event: PlayerEvent);
}

/// Capability to load and play one audio segment at a time.
pub trait Player: Send + Sync {
    /// Delay applied before the next activated segment starts playing.
    fn set_initial_delay(&self, delay: Duration);

    /// Load the segment to play next. Fails with
    /// [`MediaError::MalformedSegment`] when the URL cannot be parsed.
    fn set_url(&self, url: &str) -> Result<(), MediaError>;

    /// Start playback of the loaded segment. Fails with
    /// [`MediaError::ResourceUnavailable`] when the segment cannot be loaded.
    fn activate(&self) -> Result<(), MediaError>;

    /// Stop playback. Idempotent.
    fn deactivate(&self);

    /// Bind the listener for this activation cycle. At most one listener may
    /// be bound at a time; a second registration fails with
    /// [`MediaError::TooManyListeners`].
    fn add_listener(&self, listener: Arc<dyn PlayerListener>) -> Result<ListenerToken, MediaError>;

    /// Revoke a registration. Unknown tokens are ignored.
    fn remove_listener(&self, token: ListenerToken);
}
