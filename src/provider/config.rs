//! Configuration for the model provider

/// Provider knobs. The credential itself is never stored here; only the
/// name of the environment variable it is read from, at call time.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Maximum tokens the provider may generate per reply
    pub max_tokens: u32,

    /// Environment variable holding the API credential
    pub api_key_env: String,

    /// API base URL, overridable for tests
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-opus-20240229".to_string(),
            max_tokens: 1000,
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
        }
    }
}

impl ProviderConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = var.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ProviderConfig::default();
        assert_eq!(config.max_tokens, 1000);
        assert_eq!(config.api_key_env, "ANTHROPIC_API_KEY");
        assert!(config.base_url.starts_with("https://"));
    }

    #[test]
    fn builder_pattern() {
        let config = ProviderConfig::default()
            .with_model("test-model")
            .with_max_tokens(64)
            .with_base_url("http://localhost:9999");

        assert_eq!(config.model, "test-model");
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.base_url, "http://localhost:9999");
    }
}
