//! Generic collect core
//!
//! The state machine, its execution context, and the parsed signal
//! parameters that drive one prompt/collect/evaluate cycle. The machine is
//! generic over the media endpoints: any [`crate::media::Player`] and
//! [`crate::media::DtmfDetector`] pair can drive it.

pub mod context;
pub mod machine;
pub mod params;
pub mod playlist;
pub mod state;

pub use context::CollectContext;
pub use machine::{CollectMachine, SignalOutcome};
pub use params::CollectParams;
pub use playlist::Playlist;
pub use state::{CollectRegion, CollectState, PlayRegion};
