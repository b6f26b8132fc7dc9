use crate::domain::narration::NarrationSequencer;
use crate::domain::segment::SegmentService;
use crate::domain::speech::SpeechSynthesis;
use crate::error::AppResult;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Where the reading session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Loading,
    Reading,
    Error,
}

struct SessionState {
    status: SessionStatus,
    sequencer: Option<Arc<NarrationSequencer>>,
    error_message: Option<String>,
}

/// One reading session: takes extracted document text, has it processed into
/// segments, and hands the result to a narration sequencer. A provider
/// failure is terminal for the attempt; the user may retry by calling
/// `start` again, or leave via `reset`.
pub struct ReaderSession {
    segments: Arc<SegmentService>,
    engine: Arc<dyn SpeechSynthesis>,
    state: Mutex<SessionState>,
}

impl ReaderSession {
    pub fn new(segments: Arc<SegmentService>, engine: Arc<dyn SpeechSynthesis>) -> Self {
        Self {
            segments,
            engine,
            state: Mutex::new(SessionState {
                status: SessionStatus::Idle,
                sequencer: None,
                error_message: None,
            }),
        }
    }

    /// Process extracted document text and enter the reading state.
    ///
    /// On provider failure the session enters `Error` with a retryable,
    /// user-facing message and no partial playlist.
    pub async fn start(&self, text: &str, title: &str) -> AppResult<()> {
        {
            let mut state = self.state.lock().await;
            if let Some(sequencer) = state.sequencer.take() {
                sequencer.dispose();
            }
            state.status = SessionStatus::Loading;
            state.error_message = None;
        }

        // Lock released while the provider round trip is in flight
        match self.segments.produce(text, title).await {
            Ok(processed) => {
                tracing::info!(
                    title = %processed.title,
                    segment_count = processed.len(),
                    "Session entering reading state"
                );
                let sequencer = NarrationSequencer::new(processed, self.engine.clone());
                let mut state = self.state.lock().await;
                state.sequencer = Some(sequencer);
                state.status = SessionStatus::Reading;
                Ok(())
            }
            Err(err) => {
                tracing::error!(title = %title, error = %err, "Segment production failed");
                let mut state = self.state.lock().await;
                state.status = SessionStatus::Error;
                state.error_message = Some(
                    "Ocorreu um erro ao processar o texto. Verifique sua conexão ou tente um arquivo menor."
                        .to_string(),
                );
                Err(err.into())
            }
        }
    }

    /// Tear down any narration and return to idle.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        if let Some(sequencer) = state.sequencer.take() {
            sequencer.dispose();
        }
        state.status = SessionStatus::Idle;
        state.error_message = None;
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    /// The live sequencer, present while the session is in `Reading`.
    pub async fn sequencer(&self) -> Option<Arc<NarrationSequencer>> {
        self.state.lock().await.sequencer.clone()
    }

    /// User-facing message for the `Error` state.
    pub async fn error_message(&self) -> Option<String> {
        self.state.lock().await.error_message.clone()
    }
}
