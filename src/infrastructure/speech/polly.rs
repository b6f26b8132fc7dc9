use crate::domain::speech::{
    LanguageCode, SpeechRequest, SpeechSynthesis, SynthesisError, UtteranceHandle,
    UtteranceOutcome,
};
use crate::infrastructure::config::Config;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Create the AWS Polly client from configuration.
pub async fn create_polly_client(config: &Config) -> PollyClient {
    tracing::info!(
        region = %config.aws_region,
        "Initializing AWS Polly client"
    );

    let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
    let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
    if !has_access_key || !has_secret_key {
        tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
    }

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()))
        .load()
        .await;

    PollyClient::new(&aws_config)
}

/// Audio output seam: plays one synthesized MP3 clip, resolving when
/// playback has finished.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, audio: &[u8]) -> Result<(), String>;
}

/// AWS Polly implementation of the speech-synthesis capability.
///
/// Each `speak` call synthesizes the requested text to MP3 and pipes it to
/// the audio sink on its own task; the utterance handle resolves when the
/// sink finishes. `cancel_all` aborts every in-flight task, which closes the
/// corresponding handles without delivering an outcome.
pub struct PollySpeechSynthesizer {
    polly_client: Arc<PollyClient>,
    sink: Arc<dyn AudioSink>,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl PollySpeechSynthesizer {
    pub fn new(polly_client: Arc<PollyClient>, sink: Arc<dyn AudioSink>) -> Self {
        Self {
            polly_client,
            sink,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Select the appropriate Polly voice for a language
    fn get_voice_for_language(language: LanguageCode) -> &'static str {
        match language {
            LanguageCode::English => "Joanna",
            LanguageCode::Portuguese => "Camila",
        }
    }

    /// Wrap the text in SSML applying the requested speaking rate.
    fn build_ssml(text: &str, rate: f32) -> String {
        let percent = (rate * 100.0).round() as u32;
        format!(
            "<speak><prosody rate=\"{}%\">{}</prosody></speak>",
            percent,
            Self::escape_ssml(text)
        )
    }

    fn escape_ssml(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }

    /// Synthesize one utterance and play it through the sink.
    async fn narrate(
        polly_client: Arc<PollyClient>,
        sink: Arc<dyn AudioSink>,
        request: SpeechRequest,
    ) -> Result<(), String> {
        let voice_name = Self::get_voice_for_language(request.language);
        let voice_id = VoiceId::from(voice_name);
        let ssml = Self::build_ssml(&request.text, request.rate);

        tracing::info!(
            language = %request.language,
            voice = voice_name,
            rate = request.rate,
            text_length = request.text.len(),
            "Calling AWS Polly synthesize_speech"
        );

        let result = polly_client
            .synthesize_speech()
            .text(ssml)
            .text_type(TextType::Ssml)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    language = %request.language,
                    voice = voice_name,
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {:?}", e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;

        let audio_bytes = audio_stream.into_bytes().to_vec();
        tracing::debug!(audio_size = audio_bytes.len(), "Playing synthesized audio");

        sink.play(&audio_bytes).await
    }
}

impl SpeechSynthesis for PollySpeechSynthesizer {
    fn speak(&self, request: SpeechRequest) -> UtteranceHandle {
        let (handle, done) = UtteranceHandle::new();
        let utterance_id = handle.id;

        let polly_client = self.polly_client.clone();
        let sink = self.sink.clone();
        let task = tokio::spawn(async move {
            let outcome = match Self::narrate(polly_client, sink, request).await {
                Ok(()) => UtteranceOutcome::Completed,
                Err(message) => UtteranceOutcome::Failed(SynthesisError::Engine(message)),
            };
            // Receiver may be gone if the owner was torn down meanwhile
            if done.send(outcome).is_err() {
                tracing::debug!(%utterance_id, "Utterance outcome had no listener");
            }
        });

        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        in_flight.retain(|t| !t.is_finished());
        in_flight.push(task);

        handle
    }

    fn cancel_all(&self) {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let cancelled = in_flight.len();
        for task in in_flight.drain(..) {
            task.abort();
        }
        if cancelled > 0 {
            tracing::debug!(cancelled, "Cancelled in-flight utterances");
        }
    }
}
