use serde_json::Value;

use crate::core::error::{ProviderError, extract_api_error_message};
use crate::core::types::{AdapterContext, ModelCatalog, ProviderId};
use crate::pricing::PricingTable;
use crate::providers::chat_completions::ChatCompletionsTranslator;
use crate::providers::messages::MessagesTranslator;
use crate::providers::translator_contract::ProviderTranslator;
use crate::transport::http::{AUTH_BEARER_TOKEN_KEY, CUSTOM_HEADER_PREFIX};

pub mod adapter;
pub mod anthropic;
pub(crate) mod chat_completions;
pub mod deepseek;
pub(crate) mod messages;
pub mod openai;
pub mod openrouter;
pub(crate) mod translator_contract;

pub use adapter::LlmTranslator;

const GENERIC_RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `x-api-key: <key>` plus a pinned `anthropic-version`.
    ApiKeyHeader { version: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    ChatCompletions,
    Messages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryMode {
    /// Live listing that needs the caller's key; cached per key digest.
    KeyRequired,
    /// Live listing that works anonymously; cached per provider.
    KeyOptional,
    /// No listing endpoint; the built-in catalog is authoritative.
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    pub id: ProviderId,
    pub default_base_url: &'static str,
    pub translate_path: &'static str,
    pub models_path: Option<&'static str>,
    pub auth: AuthScheme,
    pub wire: WireFormat,
    pub default_model: &'static str,
    pub discovery: DiscoveryMode,
    pub rate_limit_message: &'static str,
    pub reports_insufficient_credits: bool,
    pub sends_site_attribution: bool,
}

impl ProviderProfile {
    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    pub fn error_message(&self, status_code: u16, body: &str) -> String {
        let name = self.display_name();
        match status_code {
            401 => format!("Invalid API key. Please check your {name} API key."),
            402 if self.reports_insufficient_credits => {
                format!("Insufficient credits. Please add credits to your {name} account.")
            }
            429 => self.rate_limit_message.to_string(),
            500 | 503 => format!("{name} service temporarily unavailable. Please try again later."),
            _ => {
                let api_error = extract_api_error_message(body).unwrap_or_default();
                format!("{name} API error (code {status_code}): {api_error}")
            }
        }
    }

    pub fn transport_error_message(&self, message: &str) -> String {
        format!("{} API error (code 0): {message}", self.display_name())
    }

    pub fn missing_key_message(&self) -> String {
        format!("Please enter your {} API key.", self.display_name())
    }

    pub fn requires_key_for_discovery(&self) -> bool {
        self.discovery == DiscoveryMode::KeyRequired
    }

    pub fn default_models(&self) -> ModelCatalog {
        match self.id {
            ProviderId::Openai => openai::default_models(),
            ProviderId::Anthropic => anthropic::default_models(),
            ProviderId::Openrouter => openrouter::default_models(),
            ProviderId::Deepseek => deepseek::default_models(),
        }
    }

    pub(crate) fn decode_models(
        &self,
        payload: &Value,
        pricing: &PricingTable,
    ) -> Result<ModelCatalog, ProviderError> {
        match self.id {
            ProviderId::Openai => openai::decode_models_list(payload, pricing),
            ProviderId::Anthropic => anthropic::decode_models_list(payload, pricing),
            ProviderId::Openrouter => openrouter::decode_models_list(payload),
            ProviderId::Deepseek => Ok(deepseek::default_models()),
        }
    }

    pub(crate) fn translator(&self) -> Box<dyn ProviderTranslator + Send + Sync> {
        match self.wire {
            WireFormat::ChatCompletions => Box::new(ChatCompletionsTranslator::new(self.id)),
            WireFormat::Messages => Box::new(MessagesTranslator::new(self.id)),
        }
    }

    pub(crate) fn auth_context(&self, api_key: Option<&str>) -> AdapterContext {
        let mut ctx = AdapterContext::default();

        match self.auth {
            AuthScheme::Bearer => {
                if let Some(api_key) = api_key {
                    ctx.metadata
                        .insert(AUTH_BEARER_TOKEN_KEY.to_string(), api_key.to_string());
                }
            }
            AuthScheme::ApiKeyHeader { version } => {
                if let Some(api_key) = api_key {
                    ctx.metadata.insert(
                        format!("{CUSTOM_HEADER_PREFIX}x-api-key"),
                        api_key.to_string(),
                    );
                }
                ctx.metadata.insert(
                    format!("{CUSTOM_HEADER_PREFIX}anthropic-version"),
                    version.to_string(),
                );
            }
        }

        ctx
    }
}

pub fn profile(provider: ProviderId) -> &'static ProviderProfile {
    match provider {
        ProviderId::Openai => &openai::PROFILE,
        ProviderId::Anthropic => &anthropic::PROFILE,
        ProviderId::Openrouter => &openrouter::PROFILE,
        ProviderId::Deepseek => &deepseek::PROFILE,
    }
}

pub(crate) fn normalize_base_url(base_url: &str, default_base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return default_base_url.to_string();
    }

    trimmed.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests;
