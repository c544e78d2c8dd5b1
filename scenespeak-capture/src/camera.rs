//
// Camera capability seam.
//
// The platform owns the actual device: permission prompts, stream startup,
// and pixel encoding all happen behind `CameraDevice`/`VideoStream`. A
// grabbed frame comes back already encoded in a transmittable format.

use async_trait::async_trait;
use scenespeak_core::types::CaptureFrame;

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("no camera device available")]
    DeviceUnavailable,

    #[error("camera stream stopped")]
    StreamStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Rear,
    Front,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub facing: Facing,
    pub audio: bool,
}

impl StreamConstraints {
    /// The constraints every capture session opens with: rear camera, no audio.
    pub fn rear_video() -> Self {
        Self {
            facing: Facing::Rear,
            audio: false,
        }
    }
}

#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Acquires a live stream, awaiting the platform permission grant.
    async fn open(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// A live video source.
///
/// `stop` is idempotent and releases the device; after it, `grab_frame`
/// returns `CameraError::StreamStopped` and `is_live` reports false.
pub trait VideoStream: Send {
    /// Draws the current frame into an offscreen raster at native resolution
    /// and returns it encoded.
    fn grab_frame(&mut self) -> Result<CaptureFrame, CameraError>;

    fn is_live(&self) -> bool;

    fn stop(&mut self);
}
