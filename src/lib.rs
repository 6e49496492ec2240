pub mod audio;
pub mod capture;
pub mod provider;
pub mod session;
pub mod speech;
pub mod ui;

use capture::CaptureError;
use provider::ProviderError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParleyError {
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("audio device error: {0}")]
    AudioDevice(String),

    #[error("audio processing error: {0}")]
    AudioProcessing(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("channel error: {0}")]
    Channel(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ParleyError {
    fn from(e: std::io::Error) -> Self {
        ParleyError::Io(e.to_string())
    }
}

impl ParleyError {
    /// Check if this error is recoverable within the running session
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Every capture failure leaves the session well-formed
            ParleyError::Capture(_) => true,
            // Provider failures leave the transcript unchanged
            ParleyError::Provider(_) => true,
            // Device errors usually need user intervention
            ParleyError::AudioDevice(_) => false,
            ParleyError::AudioProcessing(_) => true,
            ParleyError::Config(_) => false,
            ParleyError::Channel(_) => false,
            ParleyError::Io(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ParleyError::Capture(e) => match e {
                CaptureError::Setup(_) => {
                    "Microphone setup failed. Please check your audio input and try again."
                        .to_string()
                }
                CaptureError::Timeout => "No speech detected. Please try again.".to_string(),
                CaptureError::Unintelligible => {
                    "Could not understand audio. Please speak clearly and try again.".to_string()
                }
                CaptureError::Service(_) => {
                    "Speech recognition failed. Please try again.".to_string()
                }
                CaptureError::Busy => {
                    "Already listening. Wait for the current recording to finish.".to_string()
                }
            },
            ParleyError::Provider(e) => match e {
                ProviderError::MissingCredential => {
                    "No API key found. Please set your API key in the environment.".to_string()
                }
                ProviderError::Network(_) => {
                    "Could not reach the model service. Please check your connection.".to_string()
                }
                ProviderError::Api { .. } => {
                    "The model service returned an error. Please try again.".to_string()
                }
                ProviderError::EmptyResponse => {
                    "The model returned an empty reply. Please try again.".to_string()
                }
            },
            ParleyError::AudioDevice(_) => {
                "Audio device error. Please check your microphone.".to_string()
            }
            ParleyError::AudioProcessing(_) => {
                "Audio processing failed. Please try again.".to_string()
            }
            ParleyError::Config(_) => "Configuration error. Please check settings.".to_string(),
            ParleyError::Channel(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            ParleyError::Io(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
