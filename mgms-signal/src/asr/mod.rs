//! Speech-recognition subsystem
//!
//! Pluggable recognition backends (drivers) are registered by name in an
//! [`AsrDriverRegistry`] built at bootstrap. A collect operation that
//! supports speech carries an [`AsrBinding`]: an engine plus the driver name
//! and language to configure it with. Signals without speech support simply
//! have no binding, and every ASR interaction in the core is a no-op.

pub mod driver;
pub mod engine;
pub mod registry;
pub mod stub;

pub use driver::{AsrDriver, AsrDriverError, AsrDriverEventListener};
pub use engine::{AsrEngine, AsrEngineListener};
pub use registry::AsrDriverRegistry;
pub use stub::StubAsrDriver;

use std::sync::Arc;

/// The optional ASR side-channel handed to a collect operation.
#[derive(Clone)]
pub struct AsrBinding {
    pub engine: Arc<AsrEngine>,
    /// Registered driver name to recognize with
    pub driver_name: String,
    /// Language tag passed to the driver, e.g. "en"
    pub language: String,
}
