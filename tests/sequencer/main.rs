// Integration tests for the narration core.
//
// The speech-synthesis capability and the segment provider are replaced with
// scripted fakes, so every test controls exactly when an utterance completes
// or fails. State observations go through the sequencer's watch channel, the
// same surface the presentation layer renders from.

mod test_seek;
mod test_stop_and_race;
