pub mod camera;
pub mod mic;
pub mod sampler;

pub use camera::{CameraDevice, CameraError, Facing, StreamConstraints, VideoStream};
pub use mic::{MicError, MicrophoneGate, ensure_microphone_access};
pub use sampler::{SampleError, capture_sequence, capture_still};
