use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{JurisError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.x.ai";
pub const DEFAULT_CHAT_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "grok-3-latest";
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an expert legal assistant who always answers in French.";
pub const DEFAULT_ALLOWED_WEBSITES: &[&str] = &["legifrance.gouv.fr", "juricaf.org"];

/// Env vars consulted, in order, when `provider.api_key` is not configured.
pub const API_KEY_ENV_VARS: &[&str] = &["GROK_API_KEY", "XAI_API_KEY"];

/// Top-level config (juris.toml + JURIS_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JurisConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_chat_path")]
    pub chat_path: String,
    /// Bearer token. Falls back to `GROK_API_KEY` / `XAI_API_KEY` when unset.
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_path: default_chat_path(),
            api_key: None,
        }
    }
}

impl ProviderConfig {
    /// Full completions endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.chat_path)
    }

    /// Resolve the bearer token from config, then from the environment.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            return Ok(key.to_string());
        }
        API_KEY_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| JurisError::MissingCredential {
                hint: format!(
                    "provider.api_key, JURIS_PROVIDER__API_KEY or one of {}",
                    API_KEY_ENV_VARS.join(", ")
                ),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Persona and answer-language instruction sent as the system message.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    On,
    Off,
}

/// Live web search settings forwarded with every completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default = "bool_true")]
    pub return_citations: bool,
    #[serde(default = "default_allowed_websites")]
    pub allowed_websites: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::On,
            return_citations: true,
            allowed_websites: default_allowed_websites(),
        }
    }
}

fn bool_true() -> bool {
    true
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_chat_path() -> String {
    DEFAULT_CHAT_PATH.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}
fn default_allowed_websites() -> Vec<String> {
    DEFAULT_ALLOWED_WEBSITES
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl JurisConfig {
    /// Load config from a TOML file with JURIS_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. ~/.juris/juris.toml
    ///
    /// A missing file is fine: every section has defaults. Nested keys use a
    /// double underscore, e.g. `JURIS_PROVIDER__API_KEY`.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        debug!(path = %path, "loading config");

        Self::figment(&path)
            .merge(Env::prefixed("JURIS_").split("__"))
            .extract()
            .map_err(|e| JurisError::Config(e.to_string()))
    }

    fn figment(path: &str) -> Figment {
        Figment::new().merge(Toml::file(path))
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.juris/juris.toml", home)
}
