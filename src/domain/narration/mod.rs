pub mod error;
pub mod sequencer;
pub mod state;

pub use error::NarrationError;
pub use sequencer::NarrationSequencer;
pub use state::{NarrationEvent, PlaybackPhase, PlaybackState};

/// Narration speaks slightly below normal speed to aid comprehension.
pub const NARRATION_RATE: f32 = 0.9;
