use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

pub type TranslationRequest = IndexMap<String, String>;

pub type TranslationResult = IndexMap<String, String>;

pub const DEFAULT_CHUNK_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Openai,
    Anthropic,
    Openrouter,
    Deepseek,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Openai,
        ProviderId::Anthropic,
        ProviderId::Openrouter,
        ProviderId::Deepseek,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Anthropic => "anthropic",
            Self::Openrouter => "openrouter",
            Self::Deepseek => "deepseek",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Openai => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Openrouter => "OpenRouter",
            Self::Deepseek => "DeepSeek",
        }
    }

    pub fn engine_label(self) -> &'static str {
        match self {
            Self::Openai => "OpenAI (GPT)",
            Self::Anthropic => "Anthropic (Claude)",
            Self::Openrouter => "OpenRouter",
            Self::Deepseek => "DeepSeek",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::Openai),
            "anthropic" => Ok(Self::Anthropic),
            "openrouter" => Ok(Self::Openrouter),
            "deepseek" => Ok(Self::Deepseek),
            _ => Err(ConfigError::UnknownProvider {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: ProviderId,
    pub api_key: Option<String>,
    pub model: String,
    pub chunk_size: usize,
}

impl ProviderConfig {
    pub fn new(provider: ProviderId, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: sanitize_api_key(api_key),
            model: model.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Result<Self, ConfigError> {
        if chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize {
                provider: self.provider,
                chunk_size,
            });
        }
        self.chunk_size = chunk_size;
        Ok(self)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawResponse {
    Http {
        status_code: u16,
        body: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<String>,
    },
    Transport {
        message: String,
    },
}

impl RawResponse {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => Some(*status_code),
            Self::Transport { .. } => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code() == Some(200)
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Http { body, .. } => Some(body.as_str()),
            Self::Transport { .. } => None,
        }
    }

    pub fn to_log_string(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalogEntry {
    pub id: String,
    pub label: String,
}

impl ModelCatalogEntry {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModelCatalog {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ModelCatalogEntry>,
}

impl ModelCatalog {
    pub fn new(models: Vec<ModelCatalogEntry>) -> Self {
        Self { models }
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn contains(&self, model_id: &str) -> bool {
        self.models.iter().any(|entry| entry.id == model_id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.models.iter().map(|entry| entry.id.as_str()).collect()
    }

    pub fn to_map(&self) -> IndexMap<String, String> {
        self.models
            .iter()
            .map(|entry| (entry.id.clone(), entry.label.clone()))
            .collect()
    }

    pub fn with_saved_model(mut self, saved_model: &str) -> Self {
        let saved_model = saved_model.trim();
        if saved_model.is_empty() || self.contains(saved_model) {
            return self;
        }

        self.models.insert(
            0,
            ModelCatalogEntry::new(saved_model, format!("{saved_model} (saved)")),
        );
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ApiKeyStatus {
    pub error: bool,
    pub message: String,
}

impl ApiKeyStatus {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChunkOutcome {
    Accepted,
    CountMismatch { expected: usize, received: usize },
    Unparseable,
    MissingText { message: String },
    HttpStatus { status_code: u16 },
    Transport { message: String },
}

impl ChunkOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub provider: ProviderId,
    pub model: String,
    pub lang_source: String,
    pub lang_target: String,
    pub strings: IndexMap<String, String>,
    pub response: String,
    pub outcome: ChunkOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AdapterContext {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

pub(crate) fn sanitize_api_key(api_key: Option<String>) -> Option<String> {
    api_key.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
