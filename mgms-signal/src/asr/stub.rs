//! Stub recognition driver
//!
//! Emits the canned utterance "1" once five seconds of audio have been fed
//! since the session started. Useful for wiring tests and as the reference
//! driver declared in the default server configuration.

use super::driver::{AsrDriver, AsrDriverEventListener};
use mgms_common::time::monotonic_now;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use tracing::debug;

const UTTERANCE_INTERVAL_MS: u64 = 5000;

struct StubState {
    listener: Option<Arc<dyn AsrDriverEventListener>>,
    last_event_at: Option<Instant>,
}

pub struct StubAsrDriver {
    state: Mutex<StubState>,
}

impl StubAsrDriver {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StubState {
                listener: None,
                last_event_at: None,
            }),
        }
    }
}

impl Default for StubAsrDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AsrDriver for StubAsrDriver {
    fn configure(&self, params: &BTreeMap<String, String>) {
        debug!("Stub ASR driver configured with {} parameters", params.len());
    }

    fn start_recognizing(&self, language: &str) {
        debug!("Stub ASR driver recognizing in language {}", language);
        self.state.lock().expect("stub state poisoned").last_event_at = Some(monotonic_now());
    }

    fn write(&self, _data: &[u8]) {
        let mut state = self.state.lock().expect("stub state poisoned");
        let now = monotonic_now();
        let elapsed = match state.last_event_at {
            Some(last) => now.duration_since(last).as_millis() as u64,
            None => return,
        };
        if elapsed > UTTERANCE_INTERVAL_MS {
            if let Some(listener) = state.listener.clone() {
                state.last_event_at = Some(now);
                drop(state);
                listener.on_speech_recognized("1");
            }
        }
    }

    fn finish_recognizing(&self) {
        self.state.lock().expect("stub state poisoned").last_event_at = None;
    }

    fn set_listener(&self, listener: Option<Arc<dyn AsrDriverEventListener>>) {
        self.state.lock().expect("stub state poisoned").listener = listener;
    }
}
