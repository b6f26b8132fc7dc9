use crate::helpers::{
    greeting_playlist, idle, playing, playlist_of, wait_for_state, FakeSpeechEngine,
};
use accent_reader::domain::narration::{NarrationError, NarrationSequencer};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn it_should_start_narration_from_the_clicked_segment() {
    let engine = FakeSpeechEngine::new();
    let sequencer = NarrationSequencer::new(greeting_playlist(), engine.clone());
    let mut state = sequencer.subscribe();

    sequencer.play_from(1).unwrap();

    assert_eq!(sequencer.state(), playing(1));
    assert_eq!(engine.spoken_texts(), vec!["Bye"]);

    engine.complete_next();
    wait_for_state(&mut state, idle()).await;
    assert_eq!(engine.request_count(), 1);
}

#[tokio::test]
async fn it_should_cancel_current_playback_before_seeking() {
    let engine = FakeSpeechEngine::new();
    let sequencer = NarrationSequencer::new(playlist_of(4), engine.clone());
    let mut state = sequencer.subscribe();

    sequencer.play().unwrap();
    let cancels_after_play = engine.cancel_count();

    sequencer.play_from(2).unwrap();
    assert_eq!(sequencer.state(), playing(2));
    assert_eq!(engine.cancel_count(), cancels_after_play + 1);

    // Continues sequentially from the seek target exactly as play() would
    engine.complete_next();
    wait_for_state(&mut state, playing(3)).await;
    engine.complete_next();
    wait_for_state(&mut state, idle()).await;

    assert_eq!(
        engine.spoken_texts(),
        vec!["Sentence 0", "Sentence 2", "Sentence 3"]
    );
}

#[tokio::test]
async fn it_should_reject_an_out_of_range_index_with_zero_state_change() {
    let engine = FakeSpeechEngine::new();
    let sequencer = NarrationSequencer::new(greeting_playlist(), engine.clone());

    let result = sequencer.play_from(2);
    assert_eq!(result, Err(NarrationError::InvalidIndex { index: 2, len: 2 }));

    assert_eq!(sequencer.state(), idle());
    assert_eq!(engine.request_count(), 0);
    assert_eq!(engine.cancel_count(), 0);
}

#[tokio::test]
async fn it_should_reject_seeking_in_an_empty_playlist() {
    let engine = FakeSpeechEngine::new();
    let sequencer = NarrationSequencer::new(playlist_of(0), engine.clone());

    let result = sequencer.play_from(0);
    assert_eq!(result, Err(NarrationError::InvalidIndex { index: 0, len: 0 }));
    assert_eq!(sequencer.state(), idle());
}

#[tokio::test]
async fn it_should_restart_from_an_earlier_segment_while_playing() {
    let engine = FakeSpeechEngine::new();
    let sequencer = NarrationSequencer::new(greeting_playlist(), engine.clone());
    let mut state = sequencer.subscribe();

    sequencer.play().unwrap();
    engine.complete_next();
    wait_for_state(&mut state, playing(1)).await;

    // Click back on the first segment
    sequencer.play_from(0).unwrap();
    assert_eq!(sequencer.state(), playing(0));

    engine.complete_next();
    wait_for_state(&mut state, playing(1)).await;
    engine.complete_next();
    wait_for_state(&mut state, idle()).await;

    assert_eq!(engine.spoken_texts(), vec!["Hello", "Bye", "Hello", "Bye"]);
}
