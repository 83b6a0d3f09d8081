//! Collect state hierarchy
//!
//! The original design is a hierarchical state machine with two parallel
//! regions running inside the top-level play-collect state. Here the
//! hierarchy is an explicit tagged-variant enum: the two regions are two
//! sub-state fields of `PlayCollect`, and the engine synthesizes the
//! evaluate event when both regions reach their final sub-state.

/// Sub-states of the playback region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRegion {
    /// Selecting which playlist (if any) to announce
    LoadingPlaylist,
    /// Playing the initial prompt
    Prompting,
    /// Playing the reprompt after a restart
    Reprompting,
    /// Playing the no-digits reprompt
    NoDigitsReprompting,
    /// Region final: playback done (or skipped)
    Prompted,
}

impl PlayRegion {
    pub fn is_final(&self) -> bool {
        matches!(self, PlayRegion::Prompted)
    }

    /// Whether the player is actively announcing in this sub-state.
    pub fn is_playing(&self) -> bool {
        matches!(
            self,
            PlayRegion::Prompting | PlayRegion::Reprompting | PlayRegion::NoDigitsReprompting
        )
    }
}

/// Sub-states of the input-collection region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectRegion {
    /// Detector (and optionally ASR) active, accepting input
    Collecting,
    /// Region final: input closed
    Collected,
}

impl CollectRegion {
    pub fn is_final(&self) -> bool {
        matches!(self, CollectRegion::Collected)
    }
}

/// Top-level state of a collect operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectState {
    /// Both regions active in parallel
    PlayCollect {
        play: PlayRegion,
        collect: CollectRegion,
    },
    /// Deciding success or failure from the collected input
    Evaluating,
    /// Externally canceled; resolves with the same evaluation rule
    Canceled,
    /// Success determined, deciding whether to announce it
    Succeeding,
    /// Playing the success announcement
    PlayingSuccess,
    /// Terminal: operation succeeded
    Succeeded,
    /// Failure determined; retries or fixes the return code
    Failing,
    /// Playing the failure announcement
    PlayingFailure,
    /// Terminal: operation failed
    Failed,
}

impl CollectState {
    /// Initial state: both regions entered together.
    pub fn initial() -> Self {
        CollectState::PlayCollect {
            play: PlayRegion::LoadingPlaylist,
            collect: CollectRegion::Collecting,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CollectState::Succeeded | CollectState::Failed)
    }

    /// Both parallel regions reached their final sub-state.
    pub fn regions_final(&self) -> bool {
        matches!(
            self,
            CollectState::PlayCollect { play, collect } if play.is_final() && collect.is_final()
        )
    }
}
