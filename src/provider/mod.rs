//! Model provider collaborator
//!
//! A provider turns a single text prompt into a reply. Calls block from
//! the caller's perspective; there is no streaming and no caller-side
//! timeout. Failures are values from a closed enum so the session can
//! surface them without touching the transcript.

pub mod anthropic;
pub mod config;

pub use anthropic::AnthropicProvider;
pub use config::ProviderConfig;

use thiserror::Error;

/// Everything that can go wrong while requesting a reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The API credential is absent from the environment
    #[error("API credential not found in environment")]
    MissingCredential,

    /// The remote call failed before an API response arrived
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The API answered successfully but with no content
    #[error("provider returned an empty response")]
    EmptyResponse,
}

/// A source of assistant replies.
pub trait ModelProvider {
    /// Request a completion for a single prompt. Blocks until the
    /// provider answers or fails.
    fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}
