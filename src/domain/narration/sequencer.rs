use super::error::NarrationError;
use super::state::{self, Effect, NarrationEvent, PlaybackPhase, PlaybackState};
use super::NARRATION_RATE;
use crate::domain::segment::ProcessedText;
use crate::domain::speech::{LanguageCode, SpeechRequest, SpeechSynthesis, UtteranceOutcome};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;

struct Inner {
    phase: PlaybackPhase,
    /// Bumped on every cancellation; outcomes from earlier generations are
    /// stale and must be ignored.
    generation: u64,
    disposed: bool,
}

/// Drives sequential narration of a playlist through a speech-synthesis
/// capability and publishes the active segment for highlighting.
///
/// All operations are synchronous and non-blocking: a speak request returns
/// immediately and its outcome arrives later on the runtime. At most one
/// utterance is live at any time; every state-changing command cancels the
/// live utterance before issuing a new request. A late outcome from a
/// cancelled utterance is dropped by a live state read, never by trusting
/// the engine to suppress its own callbacks.
pub struct NarrationSequencer {
    playlist: ProcessedText,
    engine: Arc<dyn SpeechSynthesis>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<PlaybackState>,
    /// Handed to utterance waiter tasks so a late outcome can re-enter the
    /// sequencer without keeping it alive past its owner.
    weak_self: Weak<NarrationSequencer>,
}

impl NarrationSequencer {
    pub fn new(playlist: ProcessedText, engine: Arc<dyn SpeechSynthesis>) -> Arc<Self> {
        let (state_tx, _) = watch::channel(PlaybackState::idle());
        Arc::new_cyclic(|weak_self| Self {
            playlist,
            engine,
            inner: Mutex::new(Inner {
                phase: PlaybackPhase::Idle,
                generation: 0,
                disposed: false,
            }),
            state_tx,
            weak_self: weak_self.clone(),
        })
    }

    /// The playlist this sequencer narrates.
    pub fn playlist(&self) -> &ProcessedText {
        &self.playlist
    }

    /// Current playback snapshot.
    pub fn state(&self) -> PlaybackState {
        *self.state_tx.borrow()
    }

    /// Subscribe to playback state changes for rendering highlight state.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_tx.subscribe()
    }

    /// Start narration from segment 0.
    pub fn play(&self) -> Result<(), NarrationError> {
        let mut inner = self.lock();
        if inner.disposed {
            return Err(NarrationError::Disposed);
        }
        tracing::info!(segment_count = self.playlist.len(), "Starting narration");
        self.dispatch(&mut inner, NarrationEvent::UserPlay);
        Ok(())
    }

    /// Cancel any in-flight utterance and return to idle. Idempotent and
    /// safe to call at any time, including after `dispose`.
    pub fn stop(&self) {
        let mut inner = self.lock();
        if inner.disposed {
            return;
        }
        self.dispatch(&mut inner, NarrationEvent::UserStop);
    }

    /// The presentation layer's single play/pause entry point: stop if
    /// playing, otherwise start from the beginning. Routing both directions
    /// through one command makes a second concurrent playback loop
    /// impossible.
    pub fn toggle(&self) -> Result<(), NarrationError> {
        let mut inner = self.lock();
        if inner.disposed {
            return Err(NarrationError::Disposed);
        }
        let event = if inner.phase.is_playing() {
            NarrationEvent::UserStop
        } else {
            NarrationEvent::UserPlay
        };
        self.dispatch(&mut inner, event);
        Ok(())
    }

    /// Stop any current playback and narrate from `index` onwards.
    pub fn play_from(&self, index: usize) -> Result<(), NarrationError> {
        let mut inner = self.lock();
        if inner.disposed {
            return Err(NarrationError::Disposed);
        }
        let len = self.playlist.len();
        if index >= len {
            return Err(NarrationError::InvalidIndex { index, len });
        }
        tracing::info!(index, "Seeking narration");
        self.dispatch(&mut inner, NarrationEvent::UserSeek(index));
        Ok(())
    }

    /// Cancel everything and release the engine association. Idempotent;
    /// play operations afterwards fail with `NarrationError::Disposed`.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        if inner.disposed {
            return;
        }
        inner.disposed = true;
        inner.generation = inner.generation.wrapping_add(1);
        inner.phase = PlaybackPhase::Idle;
        self.engine.cancel_all();
        self.state_tx.send_replace(inner.phase.snapshot());
        tracing::debug!("Narration sequencer disposed");
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one event through the state machine and perform its effects while
    /// still holding the lock, so no other command can interleave between
    /// the cancel and the speak.
    fn dispatch(&self, inner: &mut Inner, event: NarrationEvent) {
        let (next, effects) = state::transition(inner.phase, event, self.playlist.len());
        inner.phase = next;

        for effect in effects {
            match effect {
                Effect::CancelAll => {
                    inner.generation = inner.generation.wrapping_add(1);
                    self.engine.cancel_all();
                }
                Effect::Speak(index) => self.speak_segment(inner, index),
            }
        }

        self.state_tx.send_replace(inner.phase.snapshot());
    }

    fn speak_segment(&self, inner: &mut Inner, index: usize) {
        let segment = &self.playlist.segments[index];
        tracing::debug!(index, "Issuing speak request");

        let handle = self.engine.speak(SpeechRequest {
            text: segment.original.clone(),
            language: LanguageCode::English,
            rate: NARRATION_RATE,
        });

        let generation = inner.generation;
        let weak = self.weak_self.clone();
        tokio::spawn(async move {
            let event = match handle.outcome.await {
                Ok(UtteranceOutcome::Completed) => NarrationEvent::EngineCompleted,
                Ok(UtteranceOutcome::Failed(err)) => {
                    tracing::warn!(index, error = %err, "Utterance failed");
                    NarrationEvent::EngineFailed
                }
                // Channel closed: the utterance was cancelled, nothing to do
                Err(_) => return,
            };
            if let Some(sequencer) = weak.upgrade() {
                sequencer.on_engine_outcome(generation, index, event);
            }
        });
    }

    /// Entry point for engine callbacks. Reads the live state: the event is
    /// honored only if this utterance's generation is still current and the
    /// sequencer is still playing this segment. Anything else is a stale
    /// callback racing a stop or seek.
    fn on_engine_outcome(&self, generation: u64, index: usize, event: NarrationEvent) {
        let mut inner = self.lock();
        if inner.disposed || inner.generation != generation {
            tracing::debug!(index, "Ignoring stale utterance outcome");
            return;
        }
        match inner.phase {
            PlaybackPhase::Playing { index: current } if current == index => {}
            _ => {
                tracing::debug!(index, "Ignoring utterance outcome while not playing");
                return;
            }
        }
        self.dispatch(&mut inner, event);
    }
}

impl Drop for NarrationSequencer {
    fn drop(&mut self) {
        // Never leak an active utterance past the sequencer's lifetime
        let inner = self.lock();
        if !inner.disposed {
            self.engine.cancel_all();
        }
    }
}
