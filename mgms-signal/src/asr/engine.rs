//! ASR engine binding
//!
//! One engine fronts exactly one driver per collection operation. The engine
//! is configured with a driver name and language, fed raw audio while
//! collection is active, and relays recognized-text events from the driver
//! to the listener bound by the state machine.

use super::driver::{AsrDriver, AsrDriverError, AsrDriverEventListener};
use super::registry::AsrDriverRegistry;
use crate::error::SignalError;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Receives recognized utterances from the engine.
pub trait AsrEngineListener: Send + Sync {
    fn on_speech_recognized(&self, text: &str);
}

struct EngineState {
    driver: Option<Arc<dyn AsrDriver>>,
    language: Option<String>,
    active: bool,
}

/// Speech-recognition engine bound to one collection operation.
pub struct AsrEngine {
    registry: Arc<AsrDriverRegistry>,
    state: Mutex<EngineState>,
    /// Listener slot shared with the driver-event relay
    listener: Arc<Mutex<Option<Arc<dyn AsrEngineListener>>>>,
}

impl AsrEngine {
    pub fn new(registry: Arc<AsrDriverRegistry>) -> Self {
        Self {
            registry,
            state: Mutex::new(EngineState {
                driver: None,
                language: None,
                active: false,
            }),
            listener: Arc::new(Mutex::new(None)),
        }
    }

    /// Select the driver and recognition language for this operation.
    ///
    /// The language is propagated verbatim to the driver when recognition
    /// starts. Fails fast when the driver name was never registered.
    pub fn configure(&self, driver_name: &str, language: &str) -> Result<(), SignalError> {
        let driver = self.registry.get(driver_name)?;
        let mut state = self.state.lock().expect("engine state poisoned");
        state.driver = Some(driver);
        state.language = Some(language.to_string());
        Ok(())
    }

    /// Bind or unbind the recognized-text listener.
    pub fn set_listener(&self, listener: Option<Arc<dyn AsrEngineListener>>) {
        *self.listener.lock().expect("listener slot poisoned") = listener;
    }

    /// Start a recognition session with the configured driver and language.
    pub fn activate(&self) -> Result<(), SignalError> {
        let mut state = self.state.lock().expect("engine state poisoned");
        let driver = state.driver.clone().ok_or(SignalError::EngineNotConfigured)?;
        let language = state.language.clone().ok_or(SignalError::EngineNotConfigured)?;
        driver.set_listener(Some(Arc::new(DriverRelay {
            listener: Arc::clone(&self.listener),
        })));
        driver.start_recognizing(&language);
        state.active = true;
        Ok(())
    }

    /// End the recognition session and unbind from the driver. Idempotent.
    pub fn deactivate(&self) {
        let mut state = self.state.lock().expect("engine state poisoned");
        if !state.active {
            return;
        }
        if let Some(driver) = state.driver.as_ref() {
            driver.finish_recognizing();
            driver.set_listener(None);
        }
        state.active = false;
    }

    /// Feed a chunk of raw audio to the active driver.
    pub fn write(&self, data: &[u8]) {
        let driver = {
            let state = self.state.lock().expect("engine state poisoned");
            if !state.active {
                return;
            }
            state.driver.clone()
        };
        if let Some(driver) = driver {
            driver.write(data);
        }
    }
}

/// Forwards driver events to the engine listener. Driver errors are logged;
/// the collect operation resolves through its timers.
struct DriverRelay {
    listener: Arc<Mutex<Option<Arc<dyn AsrEngineListener>>>>,
}

impl AsrDriverEventListener for DriverRelay {
    fn on_speech_recognized(&self, text: &str) {
        let listener = self.listener.lock().expect("listener slot poisoned").clone();
        if let Some(listener) = listener {
            listener.on_speech_recognized(text);
        }
    }

    fn on_error(&self, error: AsrDriverError, description: &str) {
        warn!("ASR driver error {}: {}", error, description);
    }
}
