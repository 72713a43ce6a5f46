use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::error::{ConfigError, ProviderError};
use crate::core::types::{AdapterContext, ProviderId, RawResponse};

pub(crate) const AUTH_BEARER_TOKEN_KEY: &str = "transport.auth.bearer_token";
pub(crate) const CUSTOM_HEADER_PREFIX: &str = "transport.header.";
const REQUEST_ID_HEADER_KEY: &str = "transport.request_id_header";
const DEFAULT_REQUEST_ID_HEADER: &str = "x-request-id";

pub const TRANSLATE_TIMEOUT_MS: u64 = 60_000;
pub const DISCOVERY_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub retryable_status_codes: Vec<u16>,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn bounded(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_attempts must be >= 1".to_string(),
            });
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_backoff_ms must be >= initial_backoff_ms".to_string(),
            });
        }
        if let Some(status) = self
            .retryable_status_codes
            .iter()
            .copied()
            .find(|status| !(100..=599).contains(status))
        {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!("retryable status code must be in 100..=599: {status}"),
            });
        }
        if let Some(status) = self
            .retryable_status_codes
            .iter()
            .copied()
            .find(|status| matches!(status, 401 | 402 | 403))
        {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: format!("credential and billing failures are never retried: {status}"),
            });
        }
        Ok(())
    }

    fn should_retry_status(&self, status_code: u16) -> bool {
        self.retryable_status_codes.contains(&status_code)
    }

    fn backoff_duration_for_retry(&self, retry_index: u32) -> Duration {
        let shift = retry_index.min(63);
        let multiplier = 1_u64.checked_shl(shift).unwrap_or(u64::MAX);
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(multiplier)
            .min(self.max_backoff_ms);
        Duration::from_millis(backoff_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff_ms: 500,
            max_backoff_ms: 8_000,
            retryable_status_codes: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status_code: u16,
    pub body: String,
    pub request_id: Option<String>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    pub fn error_for_status(
        self,
        provider: ProviderId,
        model: Option<&str>,
    ) -> Result<Self, ProviderError> {
        if self.is_success() {
            return Ok(self);
        }

        let message = if self.body.trim().is_empty() {
            format!("http status {}", self.status_code)
        } else {
            self.body
        };

        Err(ProviderError::Status {
            provider,
            model: model.map(str::to_string),
            status_code: self.status_code,
            request_id: self.request_id,
            message,
        })
    }

    pub fn json<T>(&self, provider: ProviderId, model: Option<&str>) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body).map_err(|error| ProviderError::Serialization {
            provider,
            model: model.map(str::to_string),
            request_id: self.request_id.clone(),
            message: error.to_string(),
        })
    }
}

impl From<HttpReply> for RawResponse {
    fn from(reply: HttpReply) -> Self {
        RawResponse::Http {
            status_code: reply.status_code,
            body: reply.body,
            request_id: reply.request_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    retry_policy: RetryPolicy,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64, retry_policy: RetryPolicy) -> Result<Self, ConfigError> {
        Self::with_client(reqwest::Client::new(), timeout_ms, retry_policy)
    }

    pub fn with_client(
        client: reqwest::Client,
        timeout_ms: u64,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ConfigError> {
        Self::validate_timeout(timeout_ms)?;
        retry_policy.validate()?;

        Ok(Self {
            client,
            retry_policy,
            timeout_ms,
        })
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub async fn get(
        &self,
        provider: ProviderId,
        url: &str,
        ctx: &AdapterContext,
        timeout_ms: u64,
    ) -> Result<HttpReply, ProviderError> {
        self.execute(provider, None, Method::GET, url, None, ctx, timeout_ms)
            .await
    }

    pub async fn post_json<TReq>(
        &self,
        provider: ProviderId,
        model: Option<&str>,
        url: &str,
        body: &TReq,
        ctx: &AdapterContext,
    ) -> Result<HttpReply, ProviderError>
    where
        TReq: Serialize + ?Sized,
    {
        let payload = serde_json::to_vec(body).map_err(|error| ProviderError::Serialization {
            provider,
            model: model.map(str::to_string),
            request_id: None,
            message: error.to_string(),
        })?;

        self.execute(
            provider,
            model,
            Method::POST,
            url,
            Some(payload),
            ctx,
            self.timeout_ms,
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute(
        &self,
        provider: ProviderId,
        model: Option<&str>,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        ctx: &AdapterContext,
        timeout_ms: u64,
    ) -> Result<HttpReply, ProviderError> {
        let header_config = self.build_header_config(provider, model, ctx)?;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(%provider, %method, url, attempt, "sending provider request");

            let mut request_builder = self
                .client
                .request(method.clone(), url)
                .timeout(Duration::from_millis(timeout_ms))
                .headers(header_config.headers.clone());

            if let Some(payload) = &body {
                request_builder = request_builder
                    .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                    .body(payload.clone());
            }

            match request_builder.send().await {
                Ok(response) => {
                    let status_code = response.status().as_u16();
                    let request_id =
                        extract_request_id(response.headers(), &header_config.request_id_header);
                    let body = match response.text().await {
                        Ok(body) => body,
                        Err(error) => {
                            return Err(ProviderError::Transport {
                                provider,
                                request_id,
                                message: format!(
                                    "http status {status_code}; failed to read response body: {error}"
                                ),
                            });
                        }
                    };

                    if attempt < self.retry_policy.max_attempts
                        && self.retry_policy.should_retry_status(status_code)
                    {
                        warn!(%provider, status_code, attempt, "retrying provider request");
                        self.sleep_before_retry(attempt).await;
                        continue;
                    }

                    debug!(%provider, status_code, request_id = ?request_id, "provider replied");
                    return Ok(HttpReply {
                        status_code,
                        body,
                        request_id,
                    });
                }
                Err(error) => {
                    if attempt < self.retry_policy.max_attempts && is_retryable_transport(&error) {
                        warn!(%provider, attempt, error = %error, "retrying after transport failure");
                        self.sleep_before_retry(attempt).await;
                        continue;
                    }

                    return Err(ProviderError::Transport {
                        provider,
                        request_id: None,
                        message: error.to_string(),
                    });
                }
            }
        }
    }

    fn build_header_config(
        &self,
        provider: ProviderId,
        model: Option<&str>,
        ctx: &AdapterContext,
    ) -> Result<HeaderConfig, ProviderError> {
        let request_id_header = match ctx.metadata.get(REQUEST_ID_HEADER_KEY) {
            Some(value) => parse_header_name(value, provider, model)?,
            None => HeaderName::from_static(DEFAULT_REQUEST_ID_HEADER),
        };

        let mut headers = HeaderMap::new();
        if let Some(token) = ctx.metadata.get(AUTH_BEARER_TOKEN_KEY) {
            let mut auth_value =
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|error| {
                    ProviderError::Protocol {
                        provider,
                        model: model.map(str::to_string),
                        request_id: None,
                        message: format!("invalid bearer token header value: {error}"),
                    }
                })?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
        }

        for (key, value) in &ctx.metadata {
            if let Some(raw_name) = key.strip_prefix(CUSTOM_HEADER_PREFIX) {
                let header_name = parse_header_name(raw_name, provider, model)?;
                let header_value =
                    HeaderValue::from_str(value).map_err(|error| ProviderError::Protocol {
                        provider,
                        model: model.map(str::to_string),
                        request_id: None,
                        message: format!("invalid header value for {raw_name}: {error}"),
                    })?;
                headers.insert(header_name, header_value);
            }
        }

        Ok(HeaderConfig {
            headers,
            request_id_header,
        })
    }

    fn validate_timeout(timeout_ms: u64) -> Result<(), ConfigError> {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout { timeout_ms });
        }
        Ok(())
    }

    async fn sleep_before_retry(&self, attempt: u32) {
        let retry_index = attempt.saturating_sub(1);
        let backoff = self.retry_policy.backoff_duration_for_retry(retry_index);
        tokio::time::sleep(backoff).await;
    }
}

struct HeaderConfig {
    headers: HeaderMap,
    request_id_header: HeaderName,
}

fn parse_header_name(
    value: &str,
    provider: ProviderId,
    model: Option<&str>,
) -> Result<HeaderName, ProviderError> {
    HeaderName::from_bytes(value.as_bytes()).map_err(|error| ProviderError::Protocol {
        provider,
        model: model.map(str::to_string),
        request_id: None,
        message: format!("invalid header name: {value}: {error}"),
    })
}

fn extract_request_id(headers: &HeaderMap, request_id_header: &HeaderName) -> Option<String> {
    headers
        .get(request_id_header)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn is_retryable_transport(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

#[cfg(test)]
mod tests;
