pub mod client;
pub mod controller;
pub mod session;
pub mod speech;
pub mod traits;

pub use client::HttpDescribeClient;
pub use controller::{ControllerError, PendingDescribe, SessionController};
pub use session::{Generation, InputState, Session, SessionState};
pub use speech::SpeechChannel;
pub use traits::{DescribeClient, SpeechError, SpeechRecognizer, SpeechSynthesizer};
