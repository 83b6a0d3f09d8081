//! Execution context
//!
//! Mutable session state for one collect operation. The context is owned
//! exclusively by the state machine task and mutated only from transition
//! callbacks; adapter threads never touch it directly.

use super::params::CollectParams;
use super::playlist::Playlist;
use mgms_common::time::monotonic_now;
use mgms_common::ReturnCode;
use tokio::time::Instant;

/// Mutable state of one collect operation.
pub struct CollectContext {
    params: CollectParams,

    // Playlists, each rewindable on a new attempt
    pub(crate) initial_prompt: Playlist,
    pub(crate) reprompt: Playlist,
    pub(crate) no_digits_reprompt: Playlist,
    pub(crate) failure_announcement: Playlist,
    pub(crate) success_announcement: Playlist,

    // Runtime data
    collected_digits: String,
    last_input_at: Option<Instant>,
    last_tone: Option<char>,
    attempt: u32,
    return_code: Option<ReturnCode>,
}

impl CollectContext {
    pub fn new(params: CollectParams) -> Self {
        let initial_prompt = Playlist::new(params.initial_prompt.clone());
        let reprompt = Playlist::new(params.reprompt.clone());
        let no_digits_reprompt = Playlist::new(params.no_digits_reprompt.clone());
        let failure_announcement = Playlist::new(params.failure_announcement.clone());
        let success_announcement = Playlist::new(params.success_announcement.clone());
        Self {
            params,
            initial_prompt,
            reprompt,
            no_digits_reprompt,
            failure_announcement,
            success_announcement,
            collected_digits: String::new(),
            last_input_at: None,
            last_tone: None,
            attempt: 1,
            return_code: None,
        }
    }

    pub fn params(&self) -> &CollectParams {
        &self.params
    }

    /// Append a digit and stamp the input clock.
    pub fn collect_digit(&mut self, digit: char) {
        self.collected_digits.push(digit);
        self.last_input_at = Some(monotonic_now());
    }

    /// Replace the collected buffer with recognized speech and stamp the
    /// input clock. The recognized text becomes the collected result.
    pub fn set_recognized_text(&mut self, text: &str) {
        self.collected_digits.clear();
        self.collected_digits.push_str(text);
        self.last_input_at = Some(monotonic_now());
    }

    pub fn collected_digits(&self) -> &str {
        &self.collected_digits
    }

    pub fn count_collected_digits(&self) -> usize {
        self.collected_digits.chars().count()
    }

    /// Timestamp of the most recent digit or recognized text, used to
    /// validate timers against races. `None` before any input.
    pub fn last_input_at(&self) -> Option<Instant> {
        self.last_input_at
    }

    pub fn last_tone(&self) -> Option<char> {
        self.last_tone
    }

    pub fn set_last_tone(&mut self, tone: char) {
        self.last_tone = Some(tone);
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn has_more_attempts(&self) -> bool {
        self.attempt < self.params.max_attempts
    }

    /// Increment the attempt counter, clear collected input, and rewind all
    /// five playlists to the beginning.
    pub fn new_attempt(&mut self) {
        self.attempt += 1;
        self.collected_digits.clear();
        self.last_tone = None;
        self.initial_prompt.rewind();
        self.reprompt.rewind();
        self.no_digits_reprompt.rewind();
        self.failure_announcement.rewind();
        self.success_announcement.rewind();
    }

    /// Fix the terminal return code. The first determination wins; later
    /// calls are ignored.
    pub fn set_return_code(&mut self, code: ReturnCode) {
        if self.return_code.is_none() {
            self.return_code = Some(code);
        }
    }

    pub fn return_code(&self) -> Option<ReturnCode> {
        self.return_code
    }
}
