//! Pure playback state machine.
//!
//! Playback is modeled as two phases, `Idle` and `Playing(index)`, with
//! transitions driven by user commands and engine callbacks. The transition
//! function is synchronous and side-effect free; it returns the effects the
//! caller must perform. Keeping it pure makes the stop-vs-completion race an
//! ordinary transition guard: an engine event that arrives while `Idle` is
//! simply ignored.

/// Current phase of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    Idle,
    Playing { index: usize },
}

impl PlaybackPhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackPhase::Playing { .. })
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> PlaybackState {
        match self {
            PlaybackPhase::Idle => PlaybackState {
                active_index: None,
                is_playing: false,
            },
            PlaybackPhase::Playing { index } => PlaybackState {
                active_index: Some(*index),
                is_playing: true,
            },
        }
    }
}

/// Observable playback state: which segment is highlighted and whether
/// narration is running. `active_index` is `None` when nothing is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackState {
    pub active_index: Option<usize>,
    pub is_playing: bool,
}

impl PlaybackState {
    pub fn idle() -> Self {
        PlaybackPhase::Idle.snapshot()
    }
}

/// Everything that can move the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationEvent {
    UserPlay,
    UserStop,
    /// Index must be validated against the playlist before dispatch.
    UserSeek(usize),
    EngineCompleted,
    EngineFailed,
}

/// Side effects the driver must perform, in order. Cancellation always
/// precedes a new speak request so at most one utterance is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    CancelAll,
    Speak(usize),
}

/// Apply one event to the current phase for a playlist of `len` segments.
pub fn transition(
    phase: PlaybackPhase,
    event: NarrationEvent,
    len: usize,
) -> (PlaybackPhase, Vec<Effect>) {
    use NarrationEvent::*;
    use PlaybackPhase::*;

    match (phase, event) {
        (_, UserStop) => (Idle, vec![Effect::CancelAll]),

        (_, UserPlay) => {
            if len == 0 {
                (Idle, vec![])
            } else {
                (Playing { index: 0 }, vec![Effect::CancelAll, Effect::Speak(0)])
            }
        }

        (_, UserSeek(index)) => (
            Playing { index },
            vec![Effect::CancelAll, Effect::Speak(index)],
        ),

        (Playing { index }, EngineCompleted) => {
            let next = index + 1;
            if next < len {
                (Playing { index: next }, vec![Effect::Speak(next)])
            } else {
                // Natural end of the playlist
                (Idle, vec![])
            }
        }

        // Synthesis failure ends the sequence, no retry
        (Playing { .. }, EngineFailed) => (Idle, vec![]),

        // Stale engine callback after a stop: must not resurrect playback
        (Idle, EngineCompleted) | (Idle, EngineFailed) => (Idle, vec![]),
    }
}
