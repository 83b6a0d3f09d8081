//! Shared mock media endpoints for signal integration tests

// Each integration test crate compiles its own copy; not every crate uses
// every helper.
#![allow(dead_code)]

use mgms_signal::media::{
    DtmfDetector, DtmfDetectorListener, DtmfEvent, ListenerToken, MediaError, Player, PlayerEvent,
    PlayerListener,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scriptable player. By default every activated segment completes
/// immediately; `manual()` builds a player whose segments play until the
/// test raises the event itself.
pub struct MockPlayer {
    inner: Mutex<PlayerInner>,
    auto_complete: bool,
}

struct PlayerInner {
    listener: Option<(ListenerToken, Arc<dyn PlayerListener>)>,
    next_token: u64,
    url: Option<String>,
    active: bool,
    played: Vec<String>,
    failing_urls: HashSet<String>,
}

impl MockPlayer {
    pub fn new() -> Arc<Self> {
        Self::build(true)
    }

    /// Player whose segments never complete on their own.
    pub fn manual() -> Arc<Self> {
        Self::build(false)
    }

    fn build(auto_complete: bool) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(PlayerInner {
                listener: None,
                next_token: 0,
                url: None,
                active: false,
                played: Vec::new(),
                failing_urls: HashSet::new(),
            }),
            auto_complete,
        })
    }

    /// Make activation of `url` fail with a resource error.
    pub fn fail_url(&self, url: &str) {
        self.inner.lock().unwrap().failing_urls.insert(url.to_string());
    }

    /// Raise a player event on the bound listener, if any.
    pub fn emit(&self, event: PlayerEvent) {
        let listener = self
            .inner
            .lock()
            .unwrap()
            .listener
            .as_ref()
            .map(|(_, l)| Arc::clone(l));
        if let Some(listener) = listener {
            listener.process(event);
        }
    }

    /// Segments activated so far, in order.
    pub fn played(&self) -> Vec<String> {
        self.inner.lock().unwrap().played.clone()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap().listener.iter().count()
    }

    pub fn is_active(&self) -> bool {
        self.inner.lock().unwrap().active
    }
}

impl Player for MockPlayer {
    fn set_initial_delay(&self, _delay: Duration) {}

    fn set_url(&self, url: &str) -> Result<(), MediaError> {
        self.inner.lock().unwrap().url = Some(url.to_string());
        Ok(())
    }

    fn activate(&self) -> Result<(), MediaError> {
        let listener = {
            let mut inner = self.inner.lock().unwrap();
            let url = inner.url.clone().unwrap_or_default();
            if inner.failing_urls.contains(&url) {
                return Err(MediaError::ResourceUnavailable(url));
            }
            inner.played.push(url);
            inner.active = true;
            inner.listener.as_ref().map(|(_, l)| Arc::clone(l))
        };
        if self.auto_complete {
            if let Some(listener) = listener {
                listener.process(PlayerEvent::Stop);
            }
        }
        Ok(())
    }

    fn deactivate(&self) {
        self.inner.lock().unwrap().active = false;
    }

    fn add_listener(&self, listener: Arc<dyn PlayerListener>) -> Result<ListenerToken, MediaError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.listener.is_some() {
            return Err(MediaError::TooManyListeners);
        }
        inner.next_token += 1;
        let token = ListenerToken::new(inner.next_token);
        inner.listener = Some((token, listener));
        Ok(token)
    }

    fn remove_listener(&self, token: ListenerToken) {
        let mut inner = self.inner.lock().unwrap();
        if matches!(inner.listener, Some((bound, _)) if bound == token) {
            inner.listener = None;
        }
    }
}

/// Scriptable DTMF detector. `press` forwards a tone to the bound listener
/// only while detection is active, like the real endpoint.
pub struct MockDetector {
    inner: Mutex<DetectorInner>,
}

struct DetectorInner {
    listener: Option<(ListenerToken, Arc<dyn DtmfDetectorListener>)>,
    next_token: u64,
    active: bool,
}

impl MockDetector {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(DetectorInner {
                listener: None,
                next_token: 0,
                active: false,
            }),
        })
    }

    /// Simulate a caller key press.
    pub fn press(&self, tone: char) {
        let listener = {
            let inner = self.inner.lock().unwrap();
            if !inner.active {
                return;
            }
            inner.listener.as_ref().map(|(_, l)| Arc::clone(l))
        };
        if let Some(listener) = listener {
            listener.process(DtmfEvent { tone });
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap().listener.iter().count()
    }
}

impl DtmfDetector for MockDetector {
    fn activate(&self) {
        self.inner.lock().unwrap().active = true;
    }

    fn deactivate(&self) {
        self.inner.lock().unwrap().active = false;
    }

    fn add_listener(
        &self,
        listener: Arc<dyn DtmfDetectorListener>,
    ) -> Result<ListenerToken, MediaError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.listener.is_some() {
            return Err(MediaError::TooManyListeners);
        }
        inner.next_token += 1;
        let token = ListenerToken::new(inner.next_token);
        inner.listener = Some((token, listener));
        Ok(token)
    }

    fn remove_listener(&self, token: ListenerToken) {
        let mut inner = self.inner.lock().unwrap();
        if matches!(inner.listener, Some((bound, _)) if bound == token) {
            inner.listener = None;
        }
    }
}

/// Install the test log subscriber. Safe to call from every test; only the
/// first call wins. Run with `RUST_LOG=trace` to watch transitions.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Build an MGCP-style parameter map from string pairs.
pub fn request(pairs: &[(&str, &str)]) -> std::collections::BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Let the signal task and its timers run without advancing the paused
/// clock far enough to trip any input timer.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
