use crate::core::types::ProviderId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown provider: {value}")]
    UnknownProvider { value: String },
    #[error("invalid chunk size for {provider}: {chunk_size}")]
    InvalidChunkSize {
        provider: ProviderId,
        chunk_size: usize,
    },
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
    #[error("invalid timeout: {timeout_ms} ms")]
    InvalidTimeout { timeout_ms: u64 },
    #[error("invalid retry policy: {reason}")]
    InvalidRetryPolicy { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error(
        "provider transport error{context}: {message}",
        context = format_context(Some(.provider), None, .request_id.as_deref(), None)
    )]
    Transport {
        provider: ProviderId,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "provider status error{context}: {message}",
        context = format_context(
            Some(.provider),
            .model.as_deref(),
            .request_id.as_deref(),
            Some(*.status_code)
        )
    )]
    Status {
        provider: ProviderId,
        model: Option<String>,
        status_code: u16,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "provider protocol error{context}: {message}",
        context = format_context(
            Some(.provider),
            .model.as_deref(),
            .request_id.as_deref(),
            None
        )
    )]
    Protocol {
        provider: ProviderId,
        model: Option<String>,
        request_id: Option<String>,
        message: String,
    },
    #[error(
        "provider serialization error{context}: {message}",
        context = format_context(
            Some(.provider),
            .model.as_deref(),
            .request_id.as_deref(),
            None
        )
    )]
    Serialization {
        provider: ProviderId,
        model: Option<String>,
        request_id: Option<String>,
        message: String,
    },
}

impl ProviderError {
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::Transport { provider, .. }
            | Self::Status { provider, .. }
            | Self::Protocol { provider, .. }
            | Self::Serialization { provider, .. } => *provider,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Transport { message, .. }
            | Self::Status { message, .. }
            | Self::Protocol { message, .. }
            | Self::Serialization { message, .. } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("provider not registered: {provider}")]
    ProviderNotRegistered { provider: ProviderId },
    #[error("no translation engine is active")]
    NoActiveEngine,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("API key is required.")]
    MissingApiKey { provider: ProviderId },
    #[error("{message}")]
    Request {
        provider: ProviderId,
        message: String,
    },
    #[error("Invalid response from {} API.", .provider.display_name())]
    InvalidResponse { provider: ProviderId },
}

impl CatalogError {
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::MissingApiKey { provider }
            | Self::Request { provider, .. }
            | Self::InvalidResponse { provider } => *provider,
        }
    }
}

impl From<ProviderError> for CatalogError {
    fn from(error: ProviderError) -> Self {
        let provider = error.provider();
        let message = match error {
            ProviderError::Status { message, .. } => {
                extract_api_error_message(&message)
                    .unwrap_or_else(|| "Failed to fetch models.".to_string())
            }
            ProviderError::Transport { message, .. } => message,
            ProviderError::Protocol { .. } | ProviderError::Serialization { .. } => {
                return Self::InvalidResponse { provider };
            }
        };

        Self::Request { provider, message }
    }
}

pub(crate) fn extract_api_error_message(body: &str) -> Option<String> {
    let payload = serde_json::from_str::<serde_json::Value>(body).ok()?;
    payload
        .pointer("/error/message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

fn format_context(
    provider: Option<&ProviderId>,
    model: Option<&str>,
    request_id: Option<&str>,
    status_code: Option<u16>,
) -> String {
    let mut context = Vec::new();

    if let Some(provider) = provider {
        context.push(format!("provider={provider}"));
    }
    if let Some(model) = model {
        context.push(format!("model={model}"));
    }
    if let Some(request_id) = request_id {
        context.push(format!("request_id={request_id}"));
    }
    if let Some(status_code) = status_code {
        context.push(format!("status_code={status_code}"));
    }

    if context.is_empty() {
        String::new()
    } else {
        format!(" [{}]", context.join(", "))
    }
}
