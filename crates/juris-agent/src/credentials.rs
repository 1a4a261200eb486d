use juris_core::config::ProviderConfig;

/// Supplies the bearer token and completions endpoint for each request.
pub trait CredentialProvider: Send + Sync {
    fn bearer_token(&self) -> String;

    /// Full URL of the chat completions endpoint.
    fn endpoint(&self) -> String;
}

/// Pre-provisioned API key and a fixed endpoint.
#[derive(Clone)]
pub struct StaticCredentials {
    api_key: String,
    endpoint: String,
}

impl StaticCredentials {
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Build from config; fails when no API key can be resolved.
    pub fn from_config(config: &ProviderConfig) -> juris_core::Result<Self> {
        Ok(Self::new(config.resolve_api_key()?, config.endpoint()))
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> String {
        self.api_key.clone()
    }

    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }
}

// api key stays out of logs
impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_uses_configured_key_and_endpoint() {
        let config = ProviderConfig {
            base_url: "http://localhost:9000".to_string(),
            chat_path: "/v1/chat/completions".to_string(),
            api_key: Some("xai-123".to_string()),
        };
        let creds = StaticCredentials::from_config(&config).unwrap();
        assert_eq!(creds.bearer_token(), "xai-123");
        assert_eq!(creds.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn debug_output_redacts_key() {
        let creds = StaticCredentials::new("xai-secret", "https://api.x.ai/v1/chat/completions");
        let dbg = format!("{:?}", creds);
        assert!(!dbg.contains("xai-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}
