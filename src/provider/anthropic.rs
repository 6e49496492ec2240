//! Anthropic Messages API client
//!
//! The HTTP client is async under the hood but the provider owns a
//! current-thread runtime, so `complete` blocks its caller the way the
//! session expects. The credential is read from the environment on every
//! call; a missing key is a recoverable per-call failure, never a startup
//! failure.

use crate::provider::{ModelProvider, ProviderConfig, ProviderError};
use crate::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<WireMessage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

pub struct AnthropicProvider {
    config: ProviderConfig,
    http: reqwest::Client,
    runtime: tokio::runtime::Runtime,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ParleyError::Config(format!("failed to build runtime: {e}")))?;

        Ok(Self {
            config,
            http: reqwest::Client::new(),
            runtime,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }
}

impl ModelProvider for AnthropicProvider {
    fn complete(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        let api_key = std::env::var(&self.config.api_key_env)
            .map_err(|_| ProviderError::MissingCredential)?;

        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!("requesting completion from {}", self.config.model);

        self.runtime.block_on(async {
            let response = self
                .http
                .post(self.endpoint())
                .header("x-api-key", &api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| ProviderError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                warn!("provider returned {status}: {message}");
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body: MessagesResponse = response
                .json()
                .await
                .map_err(|e| ProviderError::Network(format!("invalid response body: {e}")))?;

            body.content
                .into_iter()
                .map(|block| block.text)
                .next()
                .ok_or(ProviderError::EmptyResponse)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // The mock server lives on this runtime's worker threads while the
    // provider blocks on its own current-thread runtime.
    fn server_runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Runtime::new().unwrap()
    }

    fn provider_for(server: &MockServer, key_env: &str) -> AnthropicProvider {
        let config = ProviderConfig::default()
            .with_base_url(server.uri())
            .with_api_key_env(key_env);
        AnthropicProvider::new(config).unwrap()
    }

    #[test]
    fn missing_credential_fails_before_any_network_call() {
        let config = ProviderConfig::default().with_api_key_env("PARLEY_TEST_KEY_UNSET");
        let provider = AnthropicProvider::new(config).unwrap();

        assert_eq!(provider.complete("hi"), Err(ProviderError::MissingCredential));
    }

    #[test]
    fn returns_first_content_block() {
        let rt = server_runtime();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .and(header("anthropic-version", ANTHROPIC_VERSION))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "content": [
                        {"type": "text", "text": "hi there"},
                        {"type": "text", "text": "ignored"}
                    ]
                })))
                .mount(&server),
        );

        std::env::set_var("PARLEY_TEST_KEY_OK", "test-key");
        let provider = provider_for(&server, "PARLEY_TEST_KEY_OK");

        assert_eq!(provider.complete("hello").unwrap(), "hi there");
    }

    #[test]
    fn api_error_status_is_surfaced() {
        let rt = server_runtime();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
                .mount(&server),
        );

        std::env::set_var("PARLEY_TEST_KEY_BAD", "wrong-key");
        let provider = provider_for(&server, "PARLEY_TEST_KEY_BAD");

        match provider.complete("hello") {
            Err(ProviderError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("invalid"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn empty_content_is_an_error() {
        let rt = server_runtime();
        let server = rt.block_on(MockServer::start());
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/v1/messages"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": []})))
                .mount(&server),
        );

        std::env::set_var("PARLEY_TEST_KEY_EMPTY", "test-key");
        let provider = provider_for(&server, "PARLEY_TEST_KEY_EMPTY");

        assert_eq!(provider.complete("hello"), Err(ProviderError::EmptyResponse));
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        std::env::set_var("PARLEY_TEST_KEY_NET", "test-key");
        let config = ProviderConfig::default()
            // Reserved port on localhost, nothing listens there
            .with_base_url("http://127.0.0.1:1")
            .with_api_key_env("PARLEY_TEST_KEY_NET");
        let provider = AnthropicProvider::new(config).unwrap();

        assert!(matches!(provider.complete("hello"), Err(ProviderError::Network(_))));
    }
}
