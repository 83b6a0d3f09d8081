//! # MGMS Signal Core
//!
//! The PlayCollect signal of the MGMS media server: prompt a caller with
//! announcements, collect DTMF digits (or a recognized utterance), and
//! resolve to a single outcome with an RFC 2897 return code.
//!
//! The crate is organized around one state machine per operation:
//! - [`play_collect`] — signal entry point and running-operation handle
//! - [`collect`] — the state machine, context, and parameter parsing
//! - [`media`] — player and DTMF detector adapter contracts
//! - [`asr`] — pluggable speech-recognition drivers and the engine binding
//! - [`bootstrap`] — driver registry construction from configuration

pub mod asr;
pub mod bootstrap;
pub mod collect;
pub mod error;
pub mod media;
pub mod play_collect;

pub use collect::SignalOutcome;
pub use error::SignalError;
pub use play_collect::{PlayCollect, PlayCollectHandle};
