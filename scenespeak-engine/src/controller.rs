use crate::session::{Generation, InputState, Session, SessionState};
use crate::speech::SpeechChannel;
use crate::traits::{DescribeClient, SpeechRecognizer, SpeechSynthesizer};
use scenespeak_capture::camera::{CameraDevice, StreamConstraints};
use scenespeak_capture::mic::{MicrophoneGate, ensure_microphone_access};
use scenespeak_capture::sampler::{self, SampleError};
use scenespeak_core::config::AppConfig;
use scenespeak_core::transcript::{EntryKind, TranscriptLog};
use scenespeak_core::types::{DescribePayload, EntryId, Mode};
use scenespeak_providers::DescribeError;
use std::sync::Arc;

const MSG_CAMERA_ERROR: &str =
    "Error: Could not access camera. Please grant permission and refresh.";
const MSG_READY_TO_RECORD: &str = "Ready to record.";
const MSG_RECORDING_FAILED: &str = "Recording failed. Please try again.";
const MSG_MIC_DENIED: &str =
    "Microphone access was denied. You may need to enable it in your browser's site settings.";
const MSG_ANALYZING_IMAGE: &str = "Analyzing image...";
const MSG_ANALYZING_VIDEO: &str = "Analyzing video...";
const MSG_THINKING: &str = "Thinking...";
const SPOKEN_RECORDING: &str = "Recording";
const SPOKEN_THINKING: &str = "Thinking";
const SPOKEN_NETWORK_ERROR: &str = "Network error. Please check your internet connection.";

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("no mode selected")]
    NoActiveMode,

    #[error("new capture applies only to photo mode")]
    PhotoOnly,

    #[error("camera is not available")]
    CameraUnavailable,

    #[error("capture controls are disabled")]
    CaptureDisabled,

    #[error("a still is already captured; start a new capture first")]
    StillAlreadyCaptured,

    #[error("a describe request is already in flight")]
    RequestInFlight,

    #[error("follow-up input is not open")]
    FollowUpUnavailable,

    #[error("nothing captured to ask about")]
    NothingCaptured,

    #[error("recording produced no frames")]
    EmptyCapture,

    #[error("voice input is not configured")]
    VoiceUnavailable,

    #[error("microphone permission denied")]
    MicrophoneDenied,

    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

/// A staged describe request: everything needed to run the network round
/// trip outside the controller borrow, plus the generation token that lets
/// [`SessionController::complete_request`] reject it once the session it was
/// issued under is gone.
///
/// Every staged request must be fed back through `complete_request` exactly
/// once; the `trigger_capture`/`ask_follow_up` drivers do this themselves.
#[derive(Debug)]
pub struct PendingDescribe {
    generation: Generation,
    loading: EntryId,
    endpoint: String,
    prompt: String,
    payload: DescribePayload,
}

impl PendingDescribe {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn payload(&self) -> &DescribePayload {
        &self.payload
    }

    pub fn loading_entry(&self) -> EntryId {
        self.loading
    }
}

/// The capture-and-describe state machine.
///
/// Owns each shared singleton (camera stream, active utterance, input
/// flags) and is the only writer of any of them. All failures are converted
/// to status transcript entries at their point of origin; after any error
/// the controller is back in an interactive state.
pub struct SessionController {
    cfg: AppConfig,
    camera: Arc<dyn CameraDevice>,
    client: Arc<dyn DescribeClient>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    mic: Option<Arc<dyn MicrophoneGate>>,
    speech: SpeechChannel,
    session: Session,
    transcript: TranscriptLog,
    request_in_flight: bool,
}

impl SessionController {
    pub fn new(
        cfg: AppConfig,
        camera: Arc<dyn CameraDevice>,
        client: Arc<dyn DescribeClient>,
        speech_engine: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let speech = SpeechChannel::new(speech_engine, cfg.speech_language.clone());
        Self {
            cfg,
            camera,
            client,
            recognizer: None,
            mic: None,
            speech,
            session: Session::idle(),
            transcript: TranscriptLog::new(),
            request_in_flight: false,
        }
    }

    /// Enables spoken follow-up questions.
    pub fn with_voice_input(
        mut self,
        recognizer: Arc<dyn SpeechRecognizer>,
        mic: Arc<dyn MicrophoneGate>,
    ) -> Self {
        self.recognizer = Some(recognizer);
        self.mic = Some(mic);
        self
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn inputs(&self) -> InputState {
        self.session.inputs()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &TranscriptLog {
        &self.transcript
    }

    pub fn speech(&self) -> &SpeechChannel {
        &self.speech
    }

    /// Enters `mode`, tearing down whatever session came before and
    /// acquiring the camera. On acquisition failure the mode stays active
    /// with capture controls disabled and a status entry explains why.
    pub async fn select_mode(&mut self, mode: Mode) -> Result<(), ControllerError> {
        self.speech.cancel();
        self.transcript.clear();
        self.session.reset(Some(mode));
        self.request_in_flight = false;
        self.acquire_camera().await
    }

    /// Leaves the session entirely: camera released, speech cancelled.
    ///
    /// An in-flight request is deliberately not cancelled; its completion
    /// will find the generation stale and discard itself.
    pub fn navigate_back(&mut self) {
        self.speech.cancel();
        self.transcript.clear();
        self.session.reset(None);
        self.request_in_flight = false;
    }

    /// Photo only: discards the prior still and re-arms for a fresh capture.
    /// Legal while a request is in flight; that request resolves stale.
    pub async fn new_capture(&mut self) -> Result<(), ControllerError> {
        match self.session.mode() {
            None => return Err(ControllerError::NoActiveMode),
            Some(Mode::Video) => return Err(ControllerError::PhotoOnly),
            Some(Mode::Photo) => {}
        }
        if !self.session.inputs().capture_enabled {
            return Err(ControllerError::CaptureDisabled);
        }

        self.speech.cancel();
        self.transcript.clear();
        self.session.reset(Some(Mode::Photo));
        self.request_in_flight = false;
        self.acquire_camera().await
    }

    /// Stops any active utterance (the stop-audio control). Idempotent.
    pub fn stop_speech(&self) {
        self.speech.cancel();
    }

    /// Runs the mode's capture flow and one full describe round trip.
    pub async fn trigger_capture(&mut self) -> Result<(), ControllerError> {
        let pending = match self.session.mode() {
            None => return Err(ControllerError::NoActiveMode),
            Some(Mode::Photo) => self.begin_photo_describe()?,
            Some(Mode::Video) => self.begin_video_describe().await?,
        };
        self.dispatch(pending).await;
        Ok(())
    }

    /// Sends `question` about the already-captured media. Empty or
    /// whitespace-only questions are a no-op.
    pub async fn ask_follow_up(&mut self, question: &str) -> Result<(), ControllerError> {
        match self.begin_follow_up(question)? {
            None => Ok(()),
            Some(pending) => {
                self.dispatch(pending).await;
                Ok(())
            }
        }
    }

    /// Captures one spoken phrase and submits it as a follow-up question.
    pub async fn voice_follow_up(&mut self) -> Result<(), ControllerError> {
        let (recognizer, mic) = match (&self.recognizer, &self.mic) {
            (Some(r), Some(m)) => (r.clone(), m.clone()),
            _ => return Err(ControllerError::VoiceUnavailable),
        };
        if self.request_in_flight {
            return Err(ControllerError::RequestInFlight);
        }
        if !self.session.inputs().follow_up_enabled {
            return Err(ControllerError::FollowUpUnavailable);
        }

        if ensure_microphone_access(mic.as_ref()).await.is_err() {
            self.transcript.push(EntryKind::Status, MSG_MIC_DENIED);
            return Err(ControllerError::MicrophoneDenied);
        }

        let question = recognizer
            .recognize_once(&self.cfg.speech_language)
            .await
            .map_err(|e| {
                log::warn!("speech recognition failed: {e}");
                ControllerError::Recognition(e.to_string())
            })?;

        self.ask_follow_up(&question).await
    }

    /// Photo flow up to the network await: grabs the still, re-arms capture
    /// controls for "new capture", and stages the describe request.
    pub fn begin_photo_describe(&mut self) -> Result<PendingDescribe, ControllerError> {
        self.ensure_mode(Mode::Photo)?;
        self.ensure_capture_open()?;
        // Once a still exists the capture control means "new capture"; a
        // second describe of the same session goes through ask_follow_up.
        if self.session.has_payload() {
            return Err(ControllerError::StillAlreadyCaptured);
        }

        self.session.state = SessionState::Capturing;
        self.session.inputs = InputState::disabled();

        if self.session.stream.is_none() {
            self.session.state = SessionState::Ready;
            self.restore_inputs();
            return Err(ControllerError::CameraUnavailable);
        }
        let stream = self
            .session
            .stream
            .as_mut()
            .ok_or(ControllerError::CameraUnavailable)?;

        let frame = match sampler::capture_still(stream.as_mut()) {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("still capture failed: {e}");
                self.transcript.push(EntryKind::Status, MSG_CAMERA_ERROR);
                self.session.state = SessionState::Ready;
                self.restore_inputs();
                return Err(ControllerError::CameraUnavailable);
            }
        };

        self.session.captured = Some(DescribePayload::Still(frame));
        // The capture control now reads "new capture" and is usable at once;
        // follow-up stays closed until the response arrives.
        self.session.inputs = InputState {
            capture_enabled: true,
            follow_up_enabled: false,
        };

        let loading = self.transcript.push(EntryKind::Loading, MSG_ANALYZING_IMAGE);
        self.speech.speak(MSG_ANALYZING_IMAGE);
        self.stage_request(loading, self.cfg.photo_prompt.clone())
    }

    /// Video flow up to the network await: records the timed frame burst.
    /// A recording that yields zero frames is reported as a failed capture
    /// and never becomes a request.
    pub async fn begin_video_describe(&mut self) -> Result<PendingDescribe, ControllerError> {
        self.ensure_mode(Mode::Video)?;
        self.ensure_capture_open()?;
        if self.session.stream.is_none() {
            return Err(ControllerError::CameraUnavailable);
        }

        self.session.state = SessionState::Capturing;
        self.session.inputs = InputState::disabled();

        let cadence = self.cfg.recording;
        let loading = self.transcript.push(
            EntryKind::Loading,
            format!("Recording for {}s...", cadence.duration_ms / 1000),
        );
        self.speech.speak(SPOKEN_RECORDING);

        let stream = self
            .session
            .stream
            .as_mut()
            .ok_or(ControllerError::CameraUnavailable)?;
        let recorded = sampler::capture_sequence(stream.as_mut(), cadence).await;

        match recorded {
            Err(SampleError::EmptyCapture) => {
                self.transcript.resolve_loading(loading);
                self.transcript.push(EntryKind::Status, MSG_RECORDING_FAILED);
                self.session.state = SessionState::Ready;
                self.restore_inputs();
                Err(ControllerError::EmptyCapture)
            }
            Ok(frames) => {
                log::debug!("recorded {} frames", frames.len());
                self.session.captured = Some(DescribePayload::Frames(frames));
                self.transcript.resolve_loading(loading);
                let loading = self.transcript.push(EntryKind::Loading, MSG_ANALYZING_VIDEO);
                self.speech.speak(MSG_ANALYZING_VIDEO);
                self.stage_request(loading, self.cfg.video_prompt.clone())
            }
        }
    }

    /// Follow-up flow up to the network await. Returns `Ok(None)` for an
    /// empty question (a no-op, not an error). The User entry is appended
    /// before the Loading entry, always.
    pub fn begin_follow_up(
        &mut self,
        question: &str,
    ) -> Result<Option<PendingDescribe>, ControllerError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(None);
        }
        if self.session.mode().is_none() {
            return Err(ControllerError::NoActiveMode);
        }
        if self.request_in_flight {
            return Err(ControllerError::RequestInFlight);
        }
        if !self.session.inputs().follow_up_enabled {
            return Err(ControllerError::FollowUpUnavailable);
        }
        if !self.session.has_payload() {
            return Err(ControllerError::NothingCaptured);
        }

        self.transcript.push(EntryKind::User, question);
        self.session.inputs = InputState::disabled();
        let loading = self.transcript.push(EntryKind::Loading, MSG_THINKING);
        self.speech.speak(SPOKEN_THINKING);
        self.stage_request(loading, question.to_string()).map(Some)
    }

    /// Applies a staged request's outcome.
    ///
    /// Guarded: if the session was reset since the request was staged, the
    /// result is discarded without touching the newer session's state. The
    /// pending's Loading entry is removed exactly once, here.
    pub fn complete_request(
        &mut self,
        pending: PendingDescribe,
        outcome: Result<String, DescribeError>,
    ) {
        if pending.generation != self.session.generation() {
            log::debug!("discarding describe result for a stale session");
            return;
        }

        self.request_in_flight = false;
        self.transcript.resolve_loading(pending.loading);

        match outcome {
            Ok(description) => {
                self.transcript.push(EntryKind::Ai, description.clone());
                self.speech.speak(&description);
                self.session.state = SessionState::HasResult;
                self.session.inputs = InputState {
                    capture_enabled: true,
                    follow_up_enabled: true,
                };
            }
            Err(e) => {
                self.transcript
                    .push(EntryKind::Status, format!("Error: {e}"));
                if e.is_network() {
                    self.speech.speak(SPOKEN_NETWORK_ERROR);
                }
                self.session.state = SessionState::Ready;
                self.restore_inputs();
            }
        }
    }

    async fn dispatch(&mut self, pending: PendingDescribe) {
        let outcome = self
            .client
            .describe(&pending.endpoint, &pending.payload, &pending.prompt)
            .await;
        self.complete_request(pending, outcome);
    }

    async fn acquire_camera(&mut self) -> Result<(), ControllerError> {
        match self.camera.open(&StreamConstraints::rear_video()).await {
            Ok(stream) => {
                self.session.stream = Some(stream);
                self.session.state = SessionState::Ready;
                self.session.inputs = InputState {
                    capture_enabled: true,
                    follow_up_enabled: false,
                };
                if self.session.mode() == Some(Mode::Video) {
                    self.transcript.push(EntryKind::Status, MSG_READY_TO_RECORD);
                }
                Ok(())
            }
            Err(e) => {
                log::warn!("camera acquisition failed: {e}");
                self.transcript.push(EntryKind::Status, MSG_CAMERA_ERROR);
                self.session.state = SessionState::Ready;
                self.session.inputs = InputState::disabled();
                Err(ControllerError::CameraUnavailable)
            }
        }
    }

    fn stage_request(
        &mut self,
        loading: EntryId,
        prompt: String,
    ) -> Result<PendingDescribe, ControllerError> {
        let mode = self.session.mode().ok_or(ControllerError::NoActiveMode)?;
        let payload = self
            .session
            .captured()
            .cloned()
            .ok_or(ControllerError::NothingCaptured)?;

        self.session.state = SessionState::AwaitingResponse;
        self.request_in_flight = true;

        Ok(PendingDescribe {
            generation: self.session.generation(),
            loading,
            endpoint: self.cfg.endpoint(mode).to_string(),
            prompt,
            payload,
        })
    }

    fn ensure_mode(&self, mode: Mode) -> Result<(), ControllerError> {
        match self.session.mode() {
            Some(m) if m == mode => Ok(()),
            Some(_) | None => Err(ControllerError::NoActiveMode),
        }
    }

    fn ensure_capture_open(&self) -> Result<(), ControllerError> {
        if self.request_in_flight {
            return Err(ControllerError::RequestInFlight);
        }
        if !self.session.inputs().capture_enabled {
            return Err(ControllerError::CaptureDisabled);
        }
        Ok(())
    }

    /// Every failure path lands here: back to an interactive state, with
    /// follow-up open only when there is something captured to ask about.
    fn restore_inputs(&mut self) {
        self.session.inputs = InputState {
            capture_enabled: true,
            follow_up_enabled: self.session.has_payload(),
        };
    }
}
