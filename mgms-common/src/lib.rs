//! # MGMS Common Library
//!
//! Shared code for the MGMS media-server crates including:
//! - Error types
//! - Signal return-code taxonomy (RFC 2897 audio package)
//! - Monotonic time utilities
//! - Media-server configuration loading (ASR driver tables)

pub mod codes;
pub mod config;
pub mod error;
pub mod time;

pub use codes::ReturnCode;
pub use error::{Error, Result};
