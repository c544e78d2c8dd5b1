use async_trait::async_trait;
use scenespeak_core::types::{DescribePayload, UtteranceId};
use scenespeak_providers::DescribeError;

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("speech engine failure: {0}")]
    Engine(String),
}

/// The remote description service, one round trip per call.
#[async_trait]
pub trait DescribeClient: Send + Sync {
    async fn describe(
        &self,
        endpoint: &str,
        payload: &DescribePayload,
        prompt: &str,
    ) -> Result<String, DescribeError>;
}

/// Platform speech synthesis.
///
/// The engine plays one utterance at a time; `begin` replaces whatever was
/// playing. Completion is reported back through
/// [`SpeechChannel::notify_finished`](crate::speech::SpeechChannel::notify_finished)
/// with the utterance id `begin` was given.
pub trait SpeechSynthesizer: Send + Sync {
    fn begin(&self, id: UtteranceId, text: &str, language: &str) -> Result<(), SpeechError>;

    /// Stops playback immediately. Idempotent.
    fn stop(&self);
}

/// Platform speech recognition, single-shot: one phrase, no interim results,
/// resolving with the final transcript.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize_once(&self, language: &str) -> Result<String, SpeechError>;
}
