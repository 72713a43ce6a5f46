use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::ConfigError;
use crate::core::types::{ProviderConfig, ProviderId, sanitize_api_key};
use crate::providers;

pub const DEFAULT_LANGUAGE: &str = "en_US";

pub const KEY_TRANSLATION_ENGINE: &str = "translation-engine";
pub const KEY_MACHINE_TRANSLATION: &str = "machine-translation";
pub const KEY_DEFAULT_LANGUAGE: &str = "default-language";
pub const KEY_QUOTA: &str = "quota";
pub const KEY_SITE_URL: &str = "site-url";
pub const KEY_SITE_NAME: &str = "site-name";

const GLOBAL_ENV_KEYS: [(&str, &str); 6] = [
    ("LLM_TRANSLATE_ENGINE", KEY_TRANSLATION_ENGINE),
    ("LLM_TRANSLATE_ENABLED", KEY_MACHINE_TRANSLATION),
    ("LLM_TRANSLATE_DEFAULT_LANGUAGE", KEY_DEFAULT_LANGUAGE),
    ("LLM_TRANSLATE_QUOTA", KEY_QUOTA),
    ("LLM_TRANSLATE_SITE_URL", KEY_SITE_URL),
    ("LLM_TRANSLATE_SITE_NAME", KEY_SITE_NAME),
];

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Value>")]
pub struct Settings {
    #[serde(rename = "translation-engine")]
    pub translation_engine: String,
    #[serde(rename = "machine-translation", serialize_with = "serialize_yes_no")]
    pub machine_translation: bool,
    #[serde(rename = "default-language")]
    pub default_language: String,

    #[serde(rename = "openai-api-key", skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,
    #[serde(rename = "openai-model", skip_serializing_if = "Option::is_none")]
    pub openai_model: Option<String>,
    #[serde(rename = "openai-chunk-size", skip_serializing_if = "Option::is_none")]
    pub openai_chunk_size: Option<usize>,

    #[serde(rename = "anthropic-api-key", skip_serializing_if = "Option::is_none")]
    pub anthropic_api_key: Option<String>,
    #[serde(rename = "anthropic-model", skip_serializing_if = "Option::is_none")]
    pub anthropic_model: Option<String>,
    #[serde(rename = "anthropic-chunk-size", skip_serializing_if = "Option::is_none")]
    pub anthropic_chunk_size: Option<usize>,

    #[serde(rename = "openrouter-api-key", skip_serializing_if = "Option::is_none")]
    pub openrouter_api_key: Option<String>,
    #[serde(rename = "openrouter-model", skip_serializing_if = "Option::is_none")]
    pub openrouter_model: Option<String>,
    #[serde(rename = "openrouter-chunk-size", skip_serializing_if = "Option::is_none")]
    pub openrouter_chunk_size: Option<usize>,

    #[serde(rename = "deepseek-api-key", skip_serializing_if = "Option::is_none")]
    pub deepseek_api_key: Option<String>,
    #[serde(rename = "deepseek-model", skip_serializing_if = "Option::is_none")]
    pub deepseek_model: Option<String>,
    #[serde(rename = "deepseek-chunk-size", skip_serializing_if = "Option::is_none")]
    pub deepseek_chunk_size: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<u64>,
    #[serde(rename = "site-url", skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    #[serde(rename = "site-name", skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translation_engine: String::new(),
            machine_translation: false,
            default_language: DEFAULT_LANGUAGE.to_string(),
            openai_api_key: None,
            openai_model: None,
            openai_chunk_size: None,
            anthropic_api_key: None,
            anthropic_model: None,
            anthropic_chunk_size: None,
            openrouter_api_key: None,
            openrouter_model: None,
            openrouter_chunk_size: None,
            deepseek_api_key: None,
            deepseek_model: None,
            deepseek_chunk_size: None,
            quota: None,
            site_url: None,
            site_name: None,
        }
    }
}

struct ProviderSettings<'a> {
    api_key: &'a Option<String>,
    model: &'a Option<String>,
    chunk_size: Option<usize>,
}

impl Settings {
    pub fn from_map(values: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        for (key, value) in values {
            settings.apply(key, value)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_env_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut values = BTreeMap::new();

        for (env_name, key) in GLOBAL_ENV_KEYS {
            if let Some(value) = lookup(env_name) {
                values.insert(key.to_string(), value);
            }
        }

        for provider in ProviderId::ALL {
            let prefix = env_prefix(provider);
            for (suffix, field) in [
                ("API_KEY", "api-key"),
                ("MODEL", "model"),
                ("CHUNK_SIZE", "chunk-size"),
            ] {
                if let Some(value) = lookup(&format!("{prefix}_{suffix}")) {
                    values.insert(format!("{provider}-{field}"), value);
                }
            }
        }

        Self::from_map(&values)
    }

    pub fn active_engine(&self) -> Option<ProviderId> {
        self.translation_engine.parse().ok()
    }

    pub fn is_active(&self, provider: ProviderId) -> bool {
        self.machine_translation && self.active_engine() == Some(provider)
    }

    pub fn api_key(&self, provider: ProviderId) -> Option<&str> {
        self.provider_settings(provider)
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn model(&self, provider: ProviderId) -> &str {
        self.provider_settings(provider)
            .model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(providers::profile(provider).default_model)
    }

    pub fn provider_config(&self, provider: ProviderId) -> Result<ProviderConfig, ConfigError> {
        let config = ProviderConfig::new(
            provider,
            self.api_key(provider).map(str::to_string),
            self.model(provider),
        );

        match self.provider_settings(provider).chunk_size {
            Some(chunk_size) => config.with_chunk_size(chunk_size),
            None => Ok(config),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_language.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: KEY_DEFAULT_LANGUAGE.to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        for provider in ProviderId::ALL {
            if self.provider_settings(provider).chunk_size == Some(0) {
                return Err(ConfigError::InvalidChunkSize {
                    provider,
                    chunk_size: 0,
                });
            }
        }

        Ok(())
    }

    pub fn merge_submitted(&mut self, submitted: &BTreeMap<String, String>) {
        for provider in ProviderId::ALL {
            for field in ["api-key", "model"] {
                let key = format!("{provider}-{field}");
                let Some(value) = submitted.get(&key) else {
                    continue;
                };

                let value = sanitize_text_field(value);
                if value.is_empty() {
                    continue;
                }

                let slot = self.text_slot(provider, field);
                *slot = Some(value);
            }
        }
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            KEY_TRANSLATION_ENGINE => self.translation_engine = value.trim().to_string(),
            KEY_MACHINE_TRANSLATION => self.machine_translation = parse_yes_no(key, value)?,
            KEY_DEFAULT_LANGUAGE => self.default_language = value.trim().to_string(),
            KEY_QUOTA => self.quota = parse_optional_number(key, value)?,
            KEY_SITE_URL => self.site_url = non_empty(value),
            KEY_SITE_NAME => self.site_name = non_empty(value),
            _ => {
                let Some((provider, field)) = split_provider_key(key) else {
                    // Keys owned by other engines are not ours to judge.
                    return Ok(());
                };

                match field {
                    "api-key" => {
                        *self.text_slot(provider, field) =
                            sanitize_api_key(Some(value.to_string()));
                    }
                    "model" => *self.text_slot(provider, field) = non_empty(value),
                    "chunk-size" => {
                        *self.chunk_size_slot(provider) = parse_optional_number(key, value)?;
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn provider_settings(&self, provider: ProviderId) -> ProviderSettings<'_> {
        match provider {
            ProviderId::Openai => ProviderSettings {
                api_key: &self.openai_api_key,
                model: &self.openai_model,
                chunk_size: self.openai_chunk_size,
            },
            ProviderId::Anthropic => ProviderSettings {
                api_key: &self.anthropic_api_key,
                model: &self.anthropic_model,
                chunk_size: self.anthropic_chunk_size,
            },
            ProviderId::Openrouter => ProviderSettings {
                api_key: &self.openrouter_api_key,
                model: &self.openrouter_model,
                chunk_size: self.openrouter_chunk_size,
            },
            ProviderId::Deepseek => ProviderSettings {
                api_key: &self.deepseek_api_key,
                model: &self.deepseek_model,
                chunk_size: self.deepseek_chunk_size,
            },
        }
    }

    fn text_slot(&mut self, provider: ProviderId, field: &str) -> &mut Option<String> {
        match (provider, field == "api-key") {
            (ProviderId::Openai, true) => &mut self.openai_api_key,
            (ProviderId::Openai, false) => &mut self.openai_model,
            (ProviderId::Anthropic, true) => &mut self.anthropic_api_key,
            (ProviderId::Anthropic, false) => &mut self.anthropic_model,
            (ProviderId::Openrouter, true) => &mut self.openrouter_api_key,
            (ProviderId::Openrouter, false) => &mut self.openrouter_model,
            (ProviderId::Deepseek, true) => &mut self.deepseek_api_key,
            (ProviderId::Deepseek, false) => &mut self.deepseek_model,
        }
    }

    fn chunk_size_slot(&mut self, provider: ProviderId) -> &mut Option<usize> {
        match provider {
            ProviderId::Openai => &mut self.openai_chunk_size,
            ProviderId::Anthropic => &mut self.anthropic_chunk_size,
            ProviderId::Openrouter => &mut self.openrouter_chunk_size,
            ProviderId::Deepseek => &mut self.deepseek_chunk_size,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");

        f.debug_struct("Settings")
            .field("translation_engine", &self.translation_engine)
            .field("machine_translation", &self.machine_translation)
            .field("default_language", &self.default_language)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_model", &self.openai_model)
            .field("openai_chunk_size", &self.openai_chunk_size)
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .field("anthropic_model", &self.anthropic_model)
            .field("anthropic_chunk_size", &self.anthropic_chunk_size)
            .field("openrouter_api_key", &redact(&self.openrouter_api_key))
            .field("openrouter_model", &self.openrouter_model)
            .field("openrouter_chunk_size", &self.openrouter_chunk_size)
            .field("deepseek_api_key", &redact(&self.deepseek_api_key))
            .field("deepseek_model", &self.deepseek_model)
            .field("deepseek_chunk_size", &self.deepseek_chunk_size)
            .field("quota", &self.quota)
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .finish()
    }
}

pub fn env_prefix(provider: ProviderId) -> &'static str {
    match provider {
        ProviderId::Openai => "OPENAI",
        ProviderId::Anthropic => "ANTHROPIC",
        ProviderId::Openrouter => "OPENROUTER",
        ProviderId::Deepseek => "DEEPSEEK",
    }
}

pub fn sanitize_text_field(value: &str) -> String {
    let mut without_tags = String::with_capacity(value.len());
    let mut in_tag = false;
    for ch in value.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => without_tags.push(ch),
        }
    }

    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_provider_key(key: &str) -> Option<(ProviderId, &str)> {
    let (provider, field) = key.split_once('-')?;
    let provider = provider.parse().ok()?;
    Some((provider, field))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_yes_no(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" | "on" => Ok(true),
        "no" | "false" | "0" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidSetting {
            key: key.to_string(),
            reason: format!("expected yes or no, got {other:?}"),
        }),
    }
}

fn parse_optional_number<T>(key: &str, value: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|error| ConfigError::InvalidSetting {
            key: key.to_string(),
            reason: error.to_string(),
        })
}

fn serialize_yes_no<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(if *value { "yes" } else { "no" })
}

impl TryFrom<BTreeMap<String, Value>> for Settings {
    type Error = ConfigError;

    fn try_from(values: BTreeMap<String, Value>) -> Result<Self, Self::Error> {
        let values = values
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(text) => text,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        Self::from_map(&values)
    }
}
