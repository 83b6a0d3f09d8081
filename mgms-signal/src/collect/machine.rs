//! Collect state machine
//!
//! Drives the player, DTMF detector, and optional ASR engine through the
//! prompt/collect/evaluate/retry lifecycle of one collect operation.
//!
//! Every asynchronous source (player listener, detector listener, ASR
//! listener, timers, external cancel) funnels into one mpsc channel, so the
//! machine processes exactly one event at a time. Events fired from within
//! transition handlers go into a pending deque that is drained to quiescence
//! before the next external event is read. `Cancel` jumps the queue.
//!
//! Timers are never cancelled when superseded: each timer captures the
//! instant it was scheduled and its expiry is compared against the context's
//! last-input timestamp. Stale timers are no-ops.

use crate::asr::{AsrBinding, AsrEngineListener};
use crate::collect::context::CollectContext;
use crate::collect::state::{CollectRegion, CollectState, PlayRegion};
use crate::media::{
    DtmfDetector, DtmfDetectorListener, DtmfEvent, ListenerToken, Player, PlayerEvent,
    PlayerListener,
};
use mgms_common::time::monotonic_now;
use mgms_common::ReturnCode;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

/// Delay between consecutive tracks of one playlist.
const INTER_TRACK_DELAY: Duration = Duration::from_millis(1000);

/// Events of the collect state machine.
#[derive(Debug, Clone)]
pub(crate) enum CollectEvent {
    Prompt,
    Reprompt,
    NoDigits,
    NoPrompt,
    EndPrompt,
    NextTrack,
    DtmfTone(char),
    RecognizedText(String),
    EndInput,
    Timeout { scheduled_at: Instant },
    Restart,
    Reinput,
    Evaluate,
    Succeed,
    PatternMismatch,
    Fail,
    Cancel,
}

/// Terminal report of one collect operation, delivered exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalOutcome {
    pub operation: Uuid,
    pub result: ReturnCode,
    /// Number of attempts the user made
    pub attempt: u32,
    /// Collected digits or recognized text
    pub digits: String,
}

impl SignalOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Forwards player events into the machine queue.
struct MachinePlayerListener {
    tx: mpsc::UnboundedSender<CollectEvent>,
}

impl PlayerListener for MachinePlayerListener {
    fn process(&self, event: PlayerEvent) {
        let event = match event {
            PlayerEvent::Stop => CollectEvent::NextTrack,
            PlayerEvent::Failed => CollectEvent::Fail,
        };
        let _ = self.tx.send(event);
    }
}

/// Forwards detected tones into the machine queue.
struct MachineDetectorListener {
    tx: mpsc::UnboundedSender<CollectEvent>,
}

impl DtmfDetectorListener for MachineDetectorListener {
    fn process(&self, event: DtmfEvent) {
        let _ = self.tx.send(CollectEvent::DtmfTone(event.tone));
    }
}

/// Forwards recognized speech into the machine queue.
struct MachineAsrListener {
    tx: mpsc::UnboundedSender<CollectEvent>,
}

impl AsrEngineListener for MachineAsrListener {
    fn on_speech_recognized(&self, text: &str) {
        let _ = self.tx.send(CollectEvent::RecognizedText(text.to_string()));
    }
}

/// State machine for one collect operation.
///
/// One machine and one context exist per operation; the machine owns both
/// for its whole lifetime and is consumed by [`CollectMachine::run`].
pub struct CollectMachine {
    operation: Uuid,
    state: CollectState,
    context: CollectContext,

    // Media components
    player: Arc<dyn Player>,
    detector: Arc<dyn DtmfDetector>,
    asr: Option<AsrBinding>,

    // Event funnel
    input_tx: mpsc::UnboundedSender<CollectEvent>,
    input_rx: mpsc::UnboundedReceiver<CollectEvent>,
    pending: VecDeque<CollectEvent>,

    // Listener registrations, released on every exit path
    player_token: Option<ListenerToken>,
    detector_token: Option<ListenerToken>,

    outcome_tx: Option<oneshot::Sender<SignalOutcome>>,
}

impl CollectMachine {
    pub(crate) fn new(
        operation: Uuid,
        context: CollectContext,
        player: Arc<dyn Player>,
        detector: Arc<dyn DtmfDetector>,
        asr: Option<AsrBinding>,
        outcome_tx: oneshot::Sender<SignalOutcome>,
    ) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        Self {
            operation,
            state: CollectState::initial(),
            context,
            player,
            detector,
            asr,
            input_tx,
            input_rx,
            pending: VecDeque::new(),
            player_token: None,
            detector_token: None,
            outcome_tx: Some(outcome_tx),
        }
    }

    /// Sender used to inject external events (cancel) into the machine.
    pub(crate) fn input_sender(&self) -> mpsc::UnboundedSender<CollectEvent> {
        self.input_tx.clone()
    }

    /// Run the operation to a terminal state.
    pub(crate) async fn run(mut self) {
        debug!(operation = %self.operation, "Collect operation started");
        self.enter_play_collect(None);
        self.drain();
        while !self.state.is_terminal() {
            match self.input_rx.recv().await {
                Some(event) => self.inject(event),
                None => {
                    // All senders dropped without a cancel; resolve the
                    // operation rather than leaving it dangling.
                    warn!(operation = %self.operation, "Event sources dropped, canceling");
                    self.inject(CollectEvent::Cancel);
                }
            }
        }
        debug!(operation = %self.operation, state = ?self.state, "Collect operation finished");
    }

    /// Feed one external event and process to quiescence. Cancel pre-empts
    /// any pending transition.
    fn inject(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::Cancel => self.pending.push_front(CollectEvent::Cancel),
            other => self.pending.push_back(other),
        }
        self.drain();
    }

    /// Fire an event from within a transition handler.
    fn fire(&mut self, event: CollectEvent) {
        self.pending.push_back(event);
    }

    fn drain(&mut self) {
        while let Some(event) = self.pending.pop_front() {
            if self.state.is_terminal() {
                self.pending.clear();
                break;
            }
            self.process(event);
        }
    }

    fn process(&mut self, event: CollectEvent) {
        trace!(state = ?self.state, event = ?event, "Processing event");
        match self.state {
            CollectState::PlayCollect { .. } => self.process_play_collect(event),
            CollectState::Evaluating => self.process_evaluating(event),
            CollectState::Canceled => self.process_canceled(event),
            CollectState::Succeeding => self.process_succeeding(event),
            CollectState::PlayingSuccess => self.process_playing_success(event),
            CollectState::Failing => self.process_failing(event),
            CollectState::PlayingFailure => self.process_playing_failure(event),
            CollectState::Succeeded | CollectState::Failed => {}
        }
    }

    // ========================================
    // PLAY_COLLECT: parallel PLAY and COLLECT regions
    // ========================================

    fn process_play_collect(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::Cancel => {
                self.exit_play_collect();
                self.enter_canceled();
            }
            CollectEvent::Evaluate => {
                self.exit_play_collect();
                self.enter_evaluating();
            }
            CollectEvent::Timeout { scheduled_at } => {
                if self.timer_is_current(scheduled_at) {
                    debug!(operation = %self.operation, "Timing out collect operation");
                    self.exit_play_collect();
                    self.enter_evaluating();
                } else {
                    trace!("Ignoring stale timer: input received in the meantime");
                }
            }
            CollectEvent::Restart => {
                self.exit_play_collect();
                self.enter_failing(CollectEvent::Restart);
            }
            CollectEvent::Reinput => {
                self.exit_play_collect();
                self.enter_failing(CollectEvent::Reinput);
            }
            CollectEvent::Fail => {
                self.context.set_return_code(ReturnCode::UnspecifiedFailure);
                self.exit_play_collect();
                self.enter_failed();
            }
            other => self.process_regions(other),
        }
    }

    /// A timer is current unless input arrived after it was scheduled.
    fn timer_is_current(&self, scheduled_at: Instant) -> bool {
        self.context
            .last_input_at()
            .map_or(true, |last| last <= scheduled_at)
    }

    fn process_regions(&mut self, event: CollectEvent) {
        match event {
            // END_INPUT closes playback and collection alike
            CollectEvent::EndInput => {
                self.play_region_event(CollectEvent::EndInput);
                self.collect_region_end_input();
            }
            CollectEvent::DtmfTone(tone) => self.collect_region_tone(tone),
            CollectEvent::RecognizedText(text) => self.collect_region_text(&text),
            other => self.play_region_event(other),
        }
        if self.state.regions_final() {
            self.fire(CollectEvent::Evaluate);
        }
    }

    fn set_play_region(&mut self, region: PlayRegion) {
        if let CollectState::PlayCollect { play, .. } = &mut self.state {
            *play = region;
        }
    }

    fn set_collect_region(&mut self, region: CollectRegion) {
        if let CollectState::PlayCollect { collect, .. } = &mut self.state {
            *collect = region;
        }
    }

    fn play_region_event(&mut self, event: CollectEvent) {
        let play = match self.state {
            CollectState::PlayCollect { play, .. } => play,
            _ => return,
        };
        match (play, event) {
            (PlayRegion::LoadingPlaylist, CollectEvent::Prompt) => {
                self.enter_prompting(PlayRegion::Prompting)
            }
            (PlayRegion::LoadingPlaylist, CollectEvent::Reprompt) => {
                self.enter_prompting(PlayRegion::Reprompting)
            }
            (PlayRegion::LoadingPlaylist, CollectEvent::NoDigits) => {
                self.enter_prompting(PlayRegion::NoDigitsReprompting)
            }
            (PlayRegion::LoadingPlaylist, CollectEvent::NoPrompt) => self.enter_prompted(),
            (region, CollectEvent::NextTrack) if region.is_playing() => self.on_prompting(region),
            (region, CollectEvent::EndPrompt | CollectEvent::EndInput)
                if region.is_playing() =>
            {
                trace!(state = ?region, "Exited prompting state");
                self.exit_prompting();
                self.enter_prompted();
            }
            _ => {}
        }
    }

    fn enter_loading_playlist(&mut self, cause: Option<CollectEvent>) {
        trace!("Entered LOADING_PLAYLIST state");
        let event = match cause {
            // First entry: announce the initial prompt if there is one
            None => {
                if self.context.initial_prompt.is_empty() {
                    CollectEvent::NoPrompt
                } else {
                    CollectEvent::Prompt
                }
            }
            Some(CollectEvent::Restart) => {
                if self.context.reprompt.is_empty() {
                    CollectEvent::NoPrompt
                } else {
                    CollectEvent::Reprompt
                }
            }
            Some(CollectEvent::NoDigits) => {
                if self.context.no_digits_reprompt.is_empty() {
                    CollectEvent::NoPrompt
                } else {
                    CollectEvent::NoDigits
                }
            }
            // Reinput and anything else: no prompt replay
            Some(_) => CollectEvent::NoPrompt,
        };
        self.fire(event);
    }

    fn enter_prompting(&mut self, region: PlayRegion) {
        trace!(state = ?region, "Entered prompting state");
        self.set_play_region(region);
        if !self.bind_player_listener() {
            return;
        }
        match self.next_prompt_track(region) {
            Some(track) => self.play_announcement(&track, Duration::ZERO),
            None => self.fire(CollectEvent::EndPrompt),
        }
    }

    /// Internal NEXT_TRACK transition of the prompting sub-states.
    fn on_prompting(&mut self, region: PlayRegion) {
        match self.next_prompt_track(region) {
            Some(track) => self.play_announcement(&track, INTER_TRACK_DELAY),
            None => self.fire(CollectEvent::EndPrompt),
        }
    }

    fn next_prompt_track(&mut self, region: PlayRegion) -> Option<String> {
        let playlist = match region {
            PlayRegion::Prompting => &mut self.context.initial_prompt,
            PlayRegion::Reprompting => &mut self.context.reprompt,
            PlayRegion::NoDigitsReprompting => &mut self.context.no_digits_reprompt,
            _ => return None,
        };
        playlist.next().map(str::to_string)
    }

    /// Unconditional cleanup when leaving any announcing state, abnormal
    /// exits included, so a listener can never leak into the next cycle.
    fn exit_prompting(&mut self) {
        if let Some(token) = self.player_token.take() {
            self.player.remove_listener(token);
        }
        self.player.deactivate();
    }

    fn enter_prompted(&mut self) {
        self.set_play_region(PlayRegion::Prompted);
        if self.context.count_collected_digits() == 0 {
            let timer = self.context.params().first_digit_timer;
            trace!("Scheduled first-digit timer to fire in {:?}", timer);
            self.schedule_input_timer(timer);
        }
    }

    fn enter_collecting(&mut self) {
        trace!("Entered COLLECTING state");
        let listener = Arc::new(MachineDetectorListener {
            tx: self.input_tx.clone(),
        });
        match self.detector.add_listener(listener) {
            Ok(token) => {
                self.detector_token = Some(token);
                self.detector.activate();
            }
            Err(e) => {
                error!("Could not bind DTMF listener: {e}");
                self.context.set_return_code(ReturnCode::UnspecifiedFailure);
                self.fire(CollectEvent::Fail);
                return;
            }
        }

        if let Some(asr) = self.asr.clone() {
            asr.engine.set_listener(Some(Arc::new(MachineAsrListener {
                tx: self.input_tx.clone(),
            })));
            if let Err(e) = asr.engine.activate() {
                error!("Could not activate ASR engine: {e}");
                self.context.set_return_code(ReturnCode::UnspecifiedFailure);
                self.fire(CollectEvent::Fail);
            }
        }
    }

    fn exit_collecting(&mut self) {
        trace!("Exited COLLECTING state");
        if let Some(token) = self.detector_token.take() {
            self.detector.remove_listener(token);
        }
        self.detector.deactivate();

        if let Some(asr) = &self.asr {
            asr.engine.set_listener(None);
            asr.engine.deactivate();
        }
    }

    fn collecting(&self) -> bool {
        matches!(
            self.state,
            CollectState::PlayCollect {
                collect: CollectRegion::Collecting,
                ..
            }
        )
    }

    fn collect_region_end_input(&mut self) {
        if self.collecting() {
            self.exit_collecting();
            self.set_collect_region(CollectRegion::Collected);
        }
    }

    /// Internal DTMF_TONE transition of the COLLECTING sub-state.
    fn collect_region_tone(&mut self, tone: char) {
        if !self.collecting() {
            return;
        }
        trace!(
            digits = self.context.collected_digits(),
            attempt = self.context.attempt(),
            "Tone '{}' received",
            tone
        );
        self.context.set_last_tone(tone);

        let params = self.context.params();
        let non_interruptible = params.non_interruptible_audio;
        let reinput_key = params.reinput_key;
        let restart_key = params.restart_key;
        let end_input_key = params.end_input_key;
        let start_input_keys = params.start_input_keys.clone();
        let has_pattern = params.has_digit_pattern();
        let maximum_digits = params.maximum_digits;
        let inter_digit_timer = params.inter_digit_timer;

        // Stop the current prompt if it is interruptible
        if !non_interruptible {
            self.fire(CollectEvent::EndPrompt);
        }

        if reinput_key == Some(tone) {
            // Collecting the command key stamps the input clock, which
            // disarms any pending timeout
            self.context.collect_digit(tone);
            self.fire(CollectEvent::Reinput);
        } else if restart_key == Some(tone) {
            self.context.collect_digit(tone);
            self.fire(CollectEvent::Restart);
        } else if end_input_key == Some(tone) {
            self.fire(CollectEvent::EndInput);
        } else {
            // The first digit must match a start input key
            if self.context.count_collected_digits() == 0 && !start_input_keys.contains(tone) {
                info!(
                    "Dropping tone '{}': not in start input keys {}",
                    tone, start_input_keys
                );
                return;
            }

            self.context.collect_digit(tone);

            // Stop collecting once the maximum number of digits is reached.
            // Only verified when no digit pattern is configured.
            if !has_pattern && self.context.count_collected_digits() == maximum_digits {
                self.fire(CollectEvent::EndInput);
            } else {
                trace!("Scheduled inter-digit timer to fire in {:?}", inter_digit_timer);
                self.schedule_input_timer(inter_digit_timer);
            }
        }
    }

    /// Internal RECOGNIZED_TEXT transition of the COLLECTING sub-state: the
    /// recognized utterance becomes the collected result and closes input.
    fn collect_region_text(&mut self, text: &str) {
        if !self.collecting() {
            return;
        }
        debug!(operation = %self.operation, "Speech recognized: {}", text);
        if !self.context.params().non_interruptible_audio {
            self.fire(CollectEvent::EndPrompt);
        }
        self.context.set_recognized_text(text);
        self.fire(CollectEvent::EndInput);
    }

    fn enter_play_collect(&mut self, cause: Option<CollectEvent>) {
        trace!("Entered PLAY_COLLECT state");
        self.state = CollectState::initial();
        self.enter_loading_playlist(cause);
        self.enter_collecting();
    }

    fn exit_play_collect(&mut self) {
        if let CollectState::PlayCollect { play, collect } = self.state {
            if play.is_playing() {
                self.exit_prompting();
            }
            if matches!(collect, CollectRegion::Collecting) {
                self.exit_collecting();
            }
        }
        trace!("Exited PLAY_COLLECT state");
    }

    // ========================================
    // Evaluation and cancellation
    // ========================================

    fn enter_evaluating(&mut self) {
        trace!("Entered EVALUATING state");
        self.state = CollectState::Evaluating;
        self.fire(self.evaluate_digits());
    }

    /// Shared digit-evaluation rule of EVALUATING and CANCELED.
    fn evaluate_digits(&self) -> CollectEvent {
        let count = self.context.count_collected_digits();
        let params = self.context.params();
        if count == 0 {
            CollectEvent::NoDigits
        } else if let Some(pattern) = &params.digit_pattern {
            if pattern.is_match(self.context.collected_digits()) {
                CollectEvent::Succeed
            } else {
                CollectEvent::PatternMismatch
            }
        } else if count < params.minimum_digits {
            CollectEvent::PatternMismatch
        } else {
            CollectEvent::Succeed
        }
    }

    fn process_evaluating(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::Succeed => self.enter_succeeding(),
            CollectEvent::NoDigits => self.enter_failing(CollectEvent::NoDigits),
            CollectEvent::PatternMismatch => self.enter_failing(CollectEvent::PatternMismatch),
            CollectEvent::Cancel => self.enter_canceled(),
            _ => {}
        }
    }

    fn enter_canceled(&mut self) {
        trace!("Entered CANCELED state");
        self.state = CollectState::Canceled;
        match self.evaluate_digits() {
            CollectEvent::Succeed => self.fire(CollectEvent::Succeed),
            CollectEvent::NoDigits => {
                self.context.set_return_code(ReturnCode::NoDigits);
                self.fire(CollectEvent::Fail);
            }
            _ => {
                self.context
                    .set_return_code(ReturnCode::DigitPatternNotMatched);
                self.fire(CollectEvent::Fail);
            }
        }
    }

    fn process_canceled(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::Succeed => self.enter_succeeded(),
            CollectEvent::Fail => self.enter_failed(),
            _ => {}
        }
    }

    // ========================================
    // Success path
    // ========================================

    fn enter_succeeding(&mut self) {
        trace!("Entered SUCCEEDING state");
        self.state = CollectState::Succeeding;
        if self.context.success_announcement.is_empty() {
            self.fire(CollectEvent::NoPrompt);
        } else {
            self.fire(CollectEvent::Prompt);
        }
    }

    fn process_succeeding(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::Prompt => self.enter_playing_success(),
            CollectEvent::NoPrompt | CollectEvent::Cancel => self.enter_succeeded(),
            _ => {}
        }
    }

    fn enter_playing_success(&mut self) {
        trace!("Entered PLAYING_SUCCESS state");
        self.state = CollectState::PlayingSuccess;
        if !self.bind_player_listener() {
            return;
        }
        match self.context.success_announcement.next().map(str::to_string) {
            Some(track) => self.play_announcement(&track, Duration::ZERO),
            None => self.fire(CollectEvent::EndPrompt),
        }
    }

    fn process_playing_success(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::NextTrack => {
                match self.context.success_announcement.next().map(str::to_string) {
                    Some(track) => self.play_announcement(&track, INTER_TRACK_DELAY),
                    None => self.fire(CollectEvent::EndPrompt),
                }
            }
            CollectEvent::EndPrompt | CollectEvent::Cancel => {
                self.exit_prompting();
                self.enter_succeeded();
            }
            CollectEvent::Fail => {
                self.exit_prompting();
                self.enter_failed();
            }
            _ => {}
        }
    }

    fn enter_succeeded(&mut self) {
        trace!("Entered SUCCEEDED state");
        self.state = CollectState::Succeeded;
        let params = self.context.params();
        let mut digits = self.context.collected_digits().to_string();
        if params.include_end_input_key {
            if let Some(key) = params.end_input_key {
                digits.push(key);
            }
        }
        info!(
            operation = %self.operation,
            attempt = self.context.attempt(),
            digits = %digits,
            "Collect operation succeeded"
        );
        self.notify(ReturnCode::Success, digits);
    }

    // ========================================
    // Failure path
    // ========================================

    fn enter_failing(&mut self, cause: CollectEvent) {
        trace!("Entered FAILING state");
        self.state = CollectState::Failing;

        if self.context.has_more_attempts() {
            self.context.new_attempt();
            match cause {
                CollectEvent::Restart | CollectEvent::Reinput | CollectEvent::NoDigits => {
                    self.fire(cause)
                }
                // A pattern mismatch retries as an implicit restart
                _ => self.fire(CollectEvent::Restart),
            }
        } else {
            let code = match cause {
                CollectEvent::NoDigits => ReturnCode::NoDigits,
                CollectEvent::PatternMismatch => ReturnCode::DigitPatternNotMatched,
                CollectEvent::Restart | CollectEvent::Reinput => ReturnCode::MaxAttemptsExceeded,
                _ => ReturnCode::UnspecifiedFailure,
            };
            self.context.set_return_code(code);

            if self.context.failure_announcement.is_empty() {
                self.fire(CollectEvent::NoPrompt);
            } else {
                self.fire(CollectEvent::Prompt);
            }
        }
    }

    fn process_failing(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::Restart | CollectEvent::Reinput | CollectEvent::NoDigits => {
                // Attempts remain: loop back for a fresh attempt
                self.enter_play_collect(Some(event));
            }
            CollectEvent::Prompt => self.enter_playing_failure(),
            CollectEvent::NoPrompt => self.enter_failed(),
            CollectEvent::Cancel => {
                self.context.set_return_code(ReturnCode::UnspecifiedFailure);
                self.enter_failed();
            }
            _ => {}
        }
    }

    fn enter_playing_failure(&mut self) {
        trace!("Entered PLAYING_FAILURE state");
        self.state = CollectState::PlayingFailure;
        if !self.bind_player_listener() {
            return;
        }
        match self.context.failure_announcement.next().map(str::to_string) {
            Some(track) => self.play_announcement(&track, Duration::ZERO),
            None => self.fire(CollectEvent::EndPrompt),
        }
    }

    fn process_playing_failure(&mut self, event: CollectEvent) {
        match event {
            CollectEvent::NextTrack => {
                match self.context.failure_announcement.next().map(str::to_string) {
                    Some(track) => self.play_announcement(&track, INTER_TRACK_DELAY),
                    None => self.fire(CollectEvent::EndPrompt),
                }
            }
            CollectEvent::EndPrompt | CollectEvent::Cancel | CollectEvent::Fail => {
                self.exit_prompting();
                self.enter_failed();
            }
            _ => {}
        }
    }

    fn enter_failed(&mut self) {
        trace!("Entered FAILED state");
        self.state = CollectState::Failed;
        let code = self
            .context
            .return_code()
            .unwrap_or(ReturnCode::UnspecifiedFailure);
        info!(
            operation = %self.operation,
            attempt = self.context.attempt(),
            code = code.code(),
            "Collect operation failed"
        );
        self.notify(code, self.context.collected_digits().to_string());
    }

    // ========================================
    // Shared helpers
    // ========================================

    /// Bind the player listener for one announcing cycle. On failure the
    /// attempt is aborted with an unspecified-failure code.
    fn bind_player_listener(&mut self) -> bool {
        let listener = Arc::new(MachinePlayerListener {
            tx: self.input_tx.clone(),
        });
        match self.player.add_listener(listener) {
            Ok(token) => {
                self.player_token = Some(token);
                true
            }
            Err(e) => {
                error!("Could not bind player listener: {e}");
                self.context.set_return_code(ReturnCode::UnspecifiedFailure);
                self.fire(CollectEvent::Fail);
                false
            }
        }
    }

    /// Load and start one announcement segment. A malformed or unavailable
    /// segment aborts the attempt with a bad-audio return code.
    fn play_announcement(&mut self, url: &str, delay: Duration) {
        self.player.set_initial_delay(delay);
        let result = self
            .player
            .set_url(url)
            .and_then(|_| self.player.activate());
        if let Err(e) = result {
            warn!("Could not play segment {}: {e}", url);
            self.context.set_return_code(ReturnCode::BadAudioId);
            self.fire(CollectEvent::Fail);
        }
    }

    /// Schedule a one-shot input timer. The timer captures the instant it
    /// was scheduled; expiry is validated against the last-input timestamp.
    fn schedule_input_timer(&self, delay: Duration) {
        let scheduled_at = monotonic_now();
        let tx = self.input_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(CollectEvent::Timeout { scheduled_at });
        });
    }

    fn notify(&mut self, result: ReturnCode, digits: String) {
        if let Some(tx) = self.outcome_tx.take() {
            let _ = tx.send(SignalOutcome {
                operation: self.operation,
                result,
                attempt: self.context.attempt(),
                digits,
            });
        }
    }
}
