use async_trait::async_trait;
use scenespeak_capture::camera::{CameraDevice, CameraError, StreamConstraints, VideoStream};
use scenespeak_core::config::AppConfig;
use scenespeak_core::transcript::EntryKind;
use scenespeak_core::types::{CaptureFrame, Mode, UtteranceId};
use scenespeak_engine::client::HttpDescribeClient;
use scenespeak_engine::controller::SessionController;
use scenespeak_engine::traits::{SpeechError, SpeechSynthesizer};
use std::sync::Arc;

// SOI + EOI markers only; enough for a demo payload without shipping a photo.
const PLACEHOLDER_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xD9];

struct SyntheticStream {
    live: bool,
}

impl VideoStream for SyntheticStream {
    fn grab_frame(&mut self) -> Result<CaptureFrame, CameraError> {
        if !self.live {
            return Err(CameraError::StreamStopped);
        }
        Ok(CaptureFrame::jpeg(PLACEHOLDER_JPEG.to_vec()))
    }

    fn is_live(&self) -> bool {
        self.live
    }

    fn stop(&mut self) {
        self.live = false;
    }
}

struct SyntheticCamera;

#[async_trait]
impl CameraDevice for SyntheticCamera {
    async fn open(
        &self,
        _constraints: &StreamConstraints,
    ) -> Result<Box<dyn VideoStream>, CameraError> {
        Ok(Box::new(SyntheticStream { live: true }))
    }
}

struct ConsoleSpeech;

impl SpeechSynthesizer for ConsoleSpeech {
    fn begin(&self, _id: UtteranceId, text: &str, _language: &str) -> Result<(), SpeechError> {
        println!("[speak] {text}");
        Ok(())
    }

    fn stop(&self) {}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // MVP CLI behavior: run one capture-and-describe session against a real
    // endpoint, with a synthetic camera and speech printed to stdout.
    let cfg = AppConfig {
        photo_endpoint: std::env::var("SCENESPEAK_PHOTO_URL")
            .unwrap_or_else(|_| AppConfig::default().photo_endpoint),
        video_endpoint: std::env::var("SCENESPEAK_VIDEO_URL")
            .unwrap_or_else(|_| AppConfig::default().video_endpoint),
        ..AppConfig::default()
    };

    let mode = match std::env::args().nth(1).as_deref() {
        Some("video") => Mode::Video,
        _ => Mode::Photo,
    };

    let mut controller = SessionController::new(
        cfg,
        Arc::new(SyntheticCamera),
        Arc::new(HttpDescribeClient::new()),
        Arc::new(ConsoleSpeech),
    );

    controller.select_mode(mode).await?;
    controller.trigger_capture().await?;

    if controller.inputs().follow_up_enabled {
        controller.ask_follow_up("What else is visible?").await?;
    }

    for entry in controller.transcript().entries() {
        let tag = match entry.kind {
            EntryKind::Status => "status",
            EntryKind::Ai => "ai",
            EntryKind::User => "user",
            EntryKind::Loading => "loading",
        };
        println!("[{tag}] {}", entry.text);
    }

    controller.navigate_back();
    Ok(())
}
