use scenespeak_capture::camera::VideoStream;
use scenespeak_core::types::{DescribePayload, Mode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No mode chosen yet.
    Idle,
    /// Camera live (or acquisition failed with capture disabled), no request
    /// in flight.
    Ready,
    /// Photo: transient while the still is grabbed. Video: spans the whole
    /// recording window.
    Capturing,
    /// Exactly one describe request in flight.
    AwaitingResponse,
    /// A description has been rendered; follow-up is open.
    HasResult,
}

/// Which user inputs are currently armed.
///
/// Capture and follow-up controls disable independently: in photo mode the
/// capture control re-arms as soon as the still is taken (it now means "new
/// capture") while follow-up stays closed until the response lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    pub capture_enabled: bool,
    pub follow_up_enabled: bool,
}

impl InputState {
    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Monotonic token identifying one capture session lifetime.
///
/// Every teardown (navigate back, new capture, mode re-entry) bumps it; an
/// asynchronous continuation staged under an older generation must discard
/// its result instead of mutating the session that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Generation(u64);

impl Generation {
    pub fn first() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// All mutable session state, owned by the controller (never ambient).
pub struct Session {
    pub(crate) mode: Option<Mode>,
    pub(crate) state: SessionState,
    pub(crate) inputs: InputState,
    pub(crate) generation: Generation,
    pub(crate) stream: Option<Box<dyn VideoStream>>,
    pub(crate) captured: Option<DescribePayload>,
}

impl Session {
    pub fn idle() -> Self {
        Self {
            mode: None,
            state: SessionState::Idle,
            inputs: InputState::disabled(),
            generation: Generation::first(),
            stream: None,
            captured: None,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn inputs(&self) -> InputState {
        self.inputs
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn captured(&self) -> Option<&DescribePayload> {
        self.captured.as_ref()
    }

    pub fn has_payload(&self) -> bool {
        self.captured.is_some()
    }

    pub fn camera_live(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_live())
    }

    pub(crate) fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }

    /// Tears the session down to a fresh lifetime for `mode`.
    ///
    /// Releases the camera, discards captured media, and bumps the
    /// generation so anything still in flight resolves stale.
    pub(crate) fn reset(&mut self, mode: Option<Mode>) {
        self.release_stream();
        self.captured = None;
        self.generation = self.generation.next();
        self.inputs = InputState::disabled();
        self.mode = mode;
        self.state = match mode {
            None => SessionState::Idle,
            Some(_) => SessionState::Ready,
        };
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("inputs", &self.inputs)
            .field("generation", &self.generation)
            .field("stream", &self.stream.as_ref().map(|s| s.is_live()))
            .field("captured", &self.captured)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenespeak_core::types::CaptureFrame;

    #[test]
    fn reset_bumps_generation_and_clears_capture() {
        let mut session = Session::idle();
        session.captured = Some(DescribePayload::Still(CaptureFrame::jpeg(vec![1])));
        let before = session.generation();

        session.reset(Some(Mode::Photo));

        assert_ne!(session.generation(), before);
        assert!(session.captured().is_none());
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.inputs(), InputState::disabled());
    }

    #[test]
    fn reset_to_no_mode_is_idle() {
        let mut session = Session::idle();
        session.reset(Some(Mode::Video));
        session.reset(None);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.mode(), None);
    }

    #[test]
    fn generations_are_strictly_increasing() {
        let g0 = Generation::first();
        let g1 = g0.next();
        assert_ne!(g0, g1);
        assert_eq!(g1.next(), g0.next().next());
    }
}
