use crate::traits::SpeechSynthesizer;
use scenespeak_core::types::UtteranceId;
use std::sync::{Arc, Mutex};

struct ActiveUtterance {
    id: UtteranceId,
    on_end: Option<Box<dyn FnOnce() + Send>>,
}

/// Serializes spoken feedback: at most one utterance is active process-wide.
///
/// A newer `speak` always pre-empts the current utterance rather than
/// queueing behind it, and a pre-empted (or cancelled) utterance's completion
/// callback is dropped without running. The platform engine reports natural
/// completion through [`notify_finished`](Self::notify_finished); completions
/// for utterances that are no longer active are ignored.
#[derive(Clone)]
pub struct SpeechChannel {
    engine: Arc<dyn SpeechSynthesizer>,
    language: String,
    active: Arc<Mutex<Option<ActiveUtterance>>>,
}

impl SpeechChannel {
    pub fn new(engine: Arc<dyn SpeechSynthesizer>, language: impl Into<String>) -> Self {
        Self {
            engine,
            language: language.into(),
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn speak(&self, text: &str) -> UtteranceId {
        self.speak_with_callback(text, || {})
    }

    pub fn speak_with_callback<F>(&self, text: &str, on_end: F) -> UtteranceId
    where
        F: FnOnce() + Send + 'static,
    {
        let mut active = self.active.lock().unwrap();
        if active.take().is_some() {
            self.engine.stop();
        }

        let id = UtteranceId::new();
        match self.engine.begin(id, text, &self.language) {
            Ok(()) => {
                *active = Some(ActiveUtterance {
                    id,
                    on_end: Some(Box::new(on_end)),
                });
            }
            Err(e) => {
                // Speech is feedback, not a step the session depends on.
                log::warn!("speech engine rejected utterance: {e}");
            }
        }
        id
    }

    /// Stops the active utterance, if any. Idempotent.
    pub fn cancel(&self) {
        let mut active = self.active.lock().unwrap();
        if active.take().is_some() {
            self.engine.stop();
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.active.lock().unwrap().is_some()
    }

    /// Called by the platform engine when an utterance finishes naturally.
    pub fn notify_finished(&self, id: UtteranceId) {
        let callback = {
            let mut active = self.active.lock().unwrap();
            if active.as_ref().is_some_and(|a| a.id == id) {
                active.take().and_then(|mut a| a.on_end.take())
            } else {
                None
            }
        };

        // Run outside the lock so a callback may speak again.
        if let Some(callback) = callback {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SpeechError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeEngine {
        begun: Mutex<Vec<String>>,
        stops: AtomicUsize,
        reject: AtomicBool,
    }

    impl SpeechSynthesizer for FakeEngine {
        fn begin(&self, _id: UtteranceId, text: &str, _language: &str) -> Result<(), SpeechError> {
            if self.reject.load(Ordering::SeqCst) {
                return Err(SpeechError::Engine("no voices".into()));
            }
            self.begun.lock().unwrap().push(text.to_string());
            Ok(())
        }

        fn stop(&self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn channel() -> (SpeechChannel, Arc<FakeEngine>) {
        let engine = Arc::new(FakeEngine::default());
        (SpeechChannel::new(engine.clone(), "en-US"), engine)
    }

    #[test]
    fn speak_twice_leaves_one_active_utterance() {
        let (channel, engine) = channel();
        channel.speak("first");
        channel.speak("second");

        assert!(channel.is_speaking());
        assert_eq!(engine.stops.load(Ordering::SeqCst), 1);
        assert_eq!(*engine.begun.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn preempted_utterance_callback_never_runs() {
        let (channel, _engine) = channel();
        let first_done = Arc::new(AtomicBool::new(false));
        let second_done = Arc::new(AtomicBool::new(false));

        let flag = first_done.clone();
        let first = channel.speak_with_callback("first", move || {
            flag.store(true, Ordering::SeqCst);
        });
        let flag = second_done.clone();
        let second = channel.speak_with_callback("second", move || {
            flag.store(true, Ordering::SeqCst);
        });

        // The engine may still emit a completion for the pre-empted utterance.
        channel.notify_finished(first);
        assert!(!first_done.load(Ordering::SeqCst));
        assert!(channel.is_speaking());

        channel.notify_finished(second);
        assert!(second_done.load(Ordering::SeqCst));
        assert!(!first_done.load(Ordering::SeqCst));
        assert!(!channel.is_speaking());
    }

    #[test]
    fn cancel_is_idempotent_and_drops_the_callback() {
        let (channel, engine) = channel();
        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        let id = channel.speak_with_callback("text", move || {
            flag.store(true, Ordering::SeqCst);
        });

        channel.cancel();
        channel.cancel();

        assert!(!channel.is_speaking());
        assert_eq!(engine.stops.load(Ordering::SeqCst), 1);
        channel.notify_finished(id);
        assert!(!done.load(Ordering::SeqCst));
    }

    #[test]
    fn engine_rejection_leaves_the_channel_silent() {
        let (channel, engine) = channel();
        engine.reject.store(true, Ordering::SeqCst);
        channel.speak("text");
        assert!(!channel.is_speaking());
    }
}
