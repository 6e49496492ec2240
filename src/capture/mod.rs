//! Speech capture collaborator
//!
//! Turns live microphone audio into a recognized utterance. One attempt
//! per invocation, no retry; every failure is a value from a closed enum
//! so the session can surface it and move on.

pub mod config;
#[cfg(feature = "audio-io")]
pub mod engine;

pub use config::CaptureConfig;
#[cfg(feature = "audio-io")]
pub use engine::MicrophoneCapture;

use thiserror::Error;

/// Everything that can go wrong during a single capture attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Microphone, VAD, or recognizer initialization failed
    #[error("capture setup failed: {0}")]
    Setup(String),

    /// No speech arrived within the listen window
    #[error("no speech detected within the listen timeout")]
    Timeout,

    /// Speech was detected but nothing was recognized
    #[error("speech was not intelligible")]
    Unintelligible,

    /// The recognition backend failed mid-capture
    #[error("speech recognition service error: {0}")]
    Service(String),

    /// A capture is already in flight
    #[error("a capture is already in progress")]
    Busy,
}

/// A source of recognized utterances.
///
/// Implementations block for the duration of one listen attempt and make
/// exactly one attempt per call.
pub trait SpeechCapture {
    fn listen(&mut self) -> Result<String, CaptureError>;
}

/// Stand-in used when the crate is built without the `audio-io` feature.
pub struct DisabledCapture;

impl SpeechCapture for DisabledCapture {
    fn listen(&mut self) -> Result<String, CaptureError> {
        Err(CaptureError::Setup(
            "audio input disabled at build time".to_string(),
        ))
    }
}
