use crate::camera::VideoStream;
use scenespeak_core::config::RecordingCadence;
use scenespeak_core::types::CaptureFrame;

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("recording produced no frames")]
    EmptyCapture,
}

/// Grabs a single still from the live source.
pub fn capture_still(stream: &mut dyn VideoStream) -> Result<CaptureFrame, crate::camera::CameraError> {
    stream.grab_frame()
}

/// Samples frames at a fixed wall-clock cadence for a fixed total duration.
///
/// The cadence is timer-driven: `duration / interval` samples regardless of
/// the source's own frame rate. A stream that dies mid-recording halts the
/// sequence early and whatever was collected is returned; collecting nothing
/// at all is the `EmptyCapture` failure, which the caller must not turn into
/// a request.
pub async fn capture_sequence(
    stream: &mut dyn VideoStream,
    cadence: RecordingCadence,
) -> Result<Vec<CaptureFrame>, SampleError> {
    let budget = cadence.frame_budget();
    let mut frames = Vec::with_capacity(budget as usize);

    for _ in 0..budget {
        tokio::time::sleep(cadence.interval()).await;

        if !stream.is_live() {
            log::warn!("stream released mid-recording, keeping {} frames", frames.len());
            break;
        }

        match stream.grab_frame() {
            Ok(frame) => frames.push(frame),
            Err(e) => {
                log::warn!("frame grab failed mid-recording: {e}");
                break;
            }
        }
    }

    if frames.is_empty() {
        return Err(SampleError::EmptyCapture);
    }
    Ok(frames)
}
