//! Media adapter contracts
//!
//! The signal core drives the player and DTMF detector exclusively through
//! these traits. Codec and mixing internals live behind them, outside this
//! workspace.

pub mod detector;
pub mod player;

pub use detector::{DtmfDetector, DtmfDetectorListener, DtmfEvent};
pub use player::{Player, PlayerEvent, PlayerListener};

use thiserror::Error;

/// Failures raised by media adapters.
///
/// These never crash an operation: the state machine translates them into a
/// terminal outcome with a specific return code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaError {
    /// The audio segment URL could not be parsed
    #[error("Malformed audio segment: {0}")]
    MalformedSegment(String),

    /// The audio segment exists but could not be loaded for playback
    #[error("Audio resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// An adapter already has a listener bound for this activation cycle
    #[error("Too many listeners")]
    TooManyListeners,
}

/// Opaque handle returned by `add_listener`, required to remove the
/// registration again.
///
/// Adapters accept at most one listener per activation cycle, so every
/// registration must be revoked on every exit path before the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerToken(u64);

impl ListenerToken {
    pub fn new(id: u64) -> Self {
        ListenerToken(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}
