use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtteranceId(pub Uuid);

impl UtteranceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Capture mode. Selects endpoint, prompt text, and capture strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Photo,
    Video,
}

/// One captured image, already encoded in a device-native compressed format.
#[derive(Clone, PartialEq, Eq)]
pub struct CaptureFrame {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl CaptureFrame {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/jpeg")
    }
}

impl std::fmt::Debug for CaptureFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureFrame")
            .field("mime_type", &self.mime_type)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

/// What gets sent to the description service.
///
/// A `Frames` payload is never empty by the time it reaches the wire; the
/// controller reports an empty recording as a failure instead of sending it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescribePayload {
    Still(CaptureFrame),
    Frames(Vec<CaptureFrame>),
}

impl DescribePayload {
    pub fn frame_count(&self) -> usize {
        match self {
            DescribePayload::Still(_) => 1,
            DescribePayload::Frames(frames) => frames.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_elides_frame_bytes() {
        let frame = CaptureFrame::jpeg(vec![0xff; 4096]);
        let s = format!("{frame:?}");
        assert!(s.contains("bytes_len: 4096"));
        assert!(!s.contains("255, 255"));
    }

    #[test]
    fn payload_frame_count() {
        let f = CaptureFrame::jpeg(vec![1]);
        assert_eq!(DescribePayload::Still(f.clone()).frame_count(), 1);
        assert_eq!(DescribePayload::Frames(vec![f.clone(), f]).frame_count(), 2);
    }
}
