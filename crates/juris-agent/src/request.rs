use juris_core::config::{SearchConfig, SearchMode};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Where live search may look.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SearchSource {
    Web {
        #[serde(skip_serializing_if = "Vec::is_empty")]
        allowed_websites: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchParameters {
    pub mode: SearchMode,
    pub return_citations: bool,
    pub sources: Vec<SearchSource>,
}

impl From<&SearchConfig> for SearchParameters {
    fn from(config: &SearchConfig) -> Self {
        Self {
            mode: config.mode,
            return_citations: config.return_citations,
            sources: vec![SearchSource::Web {
                allowed_websites: config.allowed_websites.clone(),
            }],
        }
    }
}

/// One streaming chat completion request. Serializes directly to the wire
/// body; fields are fixed at construction.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    messages: Vec<Message>,
    model: String,
    stream: bool,
    search_parameters: SearchParameters,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        query: impl Into<String>,
        system_prompt: impl Into<String>,
        search: &SearchConfig,
    ) -> Self {
        Self {
            messages: vec![
                Message {
                    role: Role::System,
                    content: system_prompt.into(),
                },
                Message {
                    role: Role::User,
                    content: query.into(),
                },
            ],
            model: model.into(),
            stream: true,
            search_parameters: search.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}
