use crate::types::Mode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PHOTO_PROMPT: &str = "Describe this image in a single, concise sentence.";
pub const DEFAULT_VIDEO_PROMPT: &str =
    "Sequential frames from a short video, describes the scene and any actions or changes taking place.";

/// Wall-clock sampling plan for a video recording.
///
/// Sampling is timer-driven and independent of the source frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingCadence {
    pub duration_ms: u64,
    pub interval_ms: u64,
}

impl RecordingCadence {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// How many frames a full recording yields.
    pub fn frame_budget(&self) -> u64 {
        if self.interval_ms == 0 {
            return 0;
        }
        self.duration_ms / self.interval_ms
    }
}

impl Default for RecordingCadence {
    fn default() -> Self {
        Self {
            duration_ms: 5_000,
            interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub photo_endpoint: String,
    pub video_endpoint: String,
    pub photo_prompt: String,
    pub video_prompt: String,
    pub recording: RecordingCadence,
    pub speech_language: String,
}

impl AppConfig {
    pub fn endpoint(&self, mode: Mode) -> &str {
        match mode {
            Mode::Photo => &self.photo_endpoint,
            Mode::Video => &self.video_endpoint,
        }
    }

    pub fn prompt(&self, mode: Mode) -> &str {
        match mode {
            Mode::Photo => &self.photo_prompt,
            Mode::Video => &self.video_prompt,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            photo_endpoint: "http://localhost:8000/describe-image/".into(),
            video_endpoint: "http://localhost:8000/describe-video/".into(),
            photo_prompt: DEFAULT_PHOTO_PROMPT.into(),
            video_prompt: DEFAULT_VIDEO_PROMPT.into(),
            recording: RecordingCadence::default(),
            speech_language: "en-US".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cadence_yields_ten_frames() {
        let cadence = RecordingCadence::default();
        assert_eq!(cadence.duration_ms, 5_000);
        assert_eq!(cadence.interval_ms, 500);
        assert_eq!(cadence.frame_budget(), 10);
    }

    #[test]
    fn zero_interval_has_empty_budget() {
        let cadence = RecordingCadence {
            duration_ms: 5_000,
            interval_ms: 0,
        };
        assert_eq!(cadence.frame_budget(), 0);
    }

    #[test]
    fn endpoint_and_prompt_follow_mode() {
        let cfg = AppConfig::default();
        assert!(cfg.endpoint(Mode::Photo).contains("describe-image"));
        assert!(cfg.endpoint(Mode::Video).contains("describe-video"));
        assert_eq!(cfg.prompt(Mode::Photo), DEFAULT_PHOTO_PROMPT);
        assert_eq!(cfg.prompt(Mode::Video), DEFAULT_VIDEO_PROMPT);
    }
}
