use crate::helpers::{
    greeting_playlist, idle, playing, playlist_of, settle, wait_for_state, FakeSpeechEngine,
};
use accent_reader::domain::narration::{NarrationError, NarrationSequencer};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn it_should_stop_playback_and_cancel_the_utterance() {
    let engine = FakeSpeechEngine::new();
    let sequencer = NarrationSequencer::new(playlist_of(3), engine.clone());

    sequencer.play().unwrap();
    let cancels_after_play = engine.cancel_count();

    sequencer.stop();

    assert_eq!(sequencer.state(), idle());
    assert_eq!(engine.cancel_count(), cancels_after_play + 1);
}

#[tokio::test]
async fn it_should_treat_stop_when_already_stopped_as_a_noop() {
    let engine = FakeSpeechEngine::new();
    let sequencer = NarrationSequencer::new(playlist_of(3), engine.clone());

    sequencer.stop();
    sequencer.stop();

    // State untouched, no speak requests; only the no-op cancel_all calls
    assert_eq!(sequencer.state(), idle());
    assert_eq!(engine.request_count(), 0);
    assert_eq!(engine.cancel_count(), 2);
}

#[tokio::test]
async fn it_should_ignore_a_completion_that_raced_a_stop() {
    // Leaky engine: cancellation does not suppress the pending callback
    let engine = FakeSpeechEngine::leaky();
    let sequencer = NarrationSequencer::new(playlist_of(3), engine.clone());

    sequencer.play().unwrap();
    assert_eq!(engine.request_count(), 1);

    // Stop lands strictly before the completion callback fires
    sequencer.stop();
    assert_eq!(sequencer.state(), idle());

    // The cancelled utterance still reports completion
    engine.complete_next();
    settle().await;

    // The stale callback must not change the active index or issue segment 1
    assert_eq!(sequencer.state(), idle());
    assert_eq!(engine.request_count(), 1);
}

#[tokio::test]
async fn it_should_ignore_a_late_completion_after_toggling_off_mid_playlist() {
    let engine = FakeSpeechEngine::leaky();
    let sequencer = NarrationSequencer::new(greeting_playlist(), engine.clone());
    let mut state = sequencer.subscribe();

    sequencer.toggle().unwrap();
    engine.complete_next();
    wait_for_state(&mut state, playing(1)).await;

    // Toggle off while segment 1 is in flight
    sequencer.toggle().unwrap();
    assert_eq!(sequencer.state(), idle());
    assert!(engine.cancel_count() >= 2);

    // Late completion for segment 1 must be a no-op
    engine.complete_next();
    settle().await;
    assert_eq!(sequencer.state(), idle());
    assert_eq!(engine.request_count(), 2);
}

#[tokio::test]
async fn it_should_dispose_idempotently_and_reject_play_afterwards() {
    let engine = FakeSpeechEngine::new();
    let sequencer = NarrationSequencer::new(playlist_of(2), engine.clone());

    sequencer.play().unwrap();
    sequencer.dispose();

    assert_eq!(sequencer.state(), idle());
    assert!(engine.cancel_count() >= 1);

    assert_eq!(sequencer.play(), Err(NarrationError::Disposed));
    assert_eq!(sequencer.toggle(), Err(NarrationError::Disposed));
    assert_eq!(sequencer.play_from(0), Err(NarrationError::Disposed));

    // stop and a second dispose stay safe no-ops
    sequencer.stop();
    sequencer.dispose();
    assert_eq!(sequencer.state(), idle());
}

#[tokio::test]
async fn it_should_ignore_outcomes_that_arrive_after_dispose() {
    let engine = FakeSpeechEngine::leaky();
    let sequencer = NarrationSequencer::new(playlist_of(2), engine.clone());

    sequencer.play().unwrap();
    sequencer.dispose();

    engine.complete_next();
    settle().await;

    assert_eq!(sequencer.state(), idle());
    assert_eq!(engine.request_count(), 1);
}
