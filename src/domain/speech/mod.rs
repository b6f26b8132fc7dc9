use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use uuid::Uuid;

/// BCP-47 language tags the product narrates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "en-US")]
    English,
    #[serde(rename = "pt-BR")]
    Portuguese,
}

impl LanguageCode {
    /// Get the BCP-47 tag as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "en-US",
            LanguageCode::Portuguese => "pt-BR",
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One speech request: the text to voice, its language, and the playback
/// rate (1.0 is the engine's normal speed).
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub language: LanguageCode,
    pub rate: f32,
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("speech engine error: {0}")]
    Engine(String),
}

/// Terminal outcome of one utterance. Delivered exactly once per handle;
/// a cancelled utterance closes the channel instead of delivering.
#[derive(Debug)]
pub enum UtteranceOutcome {
    Completed,
    Failed(SynthesisError),
}

/// Handle to one in-flight utterance. The owner awaits `outcome` to learn
/// how the utterance ended; a closed channel means it was cancelled.
#[derive(Debug)]
pub struct UtteranceHandle {
    pub id: Uuid,
    pub outcome: oneshot::Receiver<UtteranceOutcome>,
}

impl UtteranceHandle {
    /// Create a handle and the sender the engine resolves it with.
    pub fn new() -> (Self, oneshot::Sender<UtteranceOutcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                id: Uuid::new_v4(),
                outcome: rx,
            },
            tx,
        )
    }
}

/// Speech-synthesis capability.
/// Abstracts the underlying engine (AWS Polly, a platform voice, a fake in
/// tests). The capability is process-wide and may be shared with other code,
/// so callers must cancel before speaking rather than assume exclusivity.
pub trait SpeechSynthesis: Send + Sync {
    /// Issue a speech request. Returns immediately; completion or failure is
    /// delivered later through the handle.
    fn speak(&self, request: SpeechRequest) -> UtteranceHandle;

    /// Cancel all pending and in-flight utterances belonging to this process.
    /// Cooperative: the engine may still deliver a late outcome for an
    /// utterance that was already in flight, so callers must not rely on
    /// suppression alone.
    fn cancel_all(&self);
}
