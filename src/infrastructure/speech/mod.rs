pub mod polly;

pub use polly::{create_polly_client, AudioSink, PollySpeechSynthesizer};
