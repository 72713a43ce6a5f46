use async_trait::async_trait;
use serde_json::Value;

use crate::core::error::{CatalogError, ProviderError};
use crate::core::types::{
    ApiKeyStatus, AuditEntry, ModelCatalog, ProviderId, RawResponse, TranslationRequest,
    TranslationResult,
};

/// Machine translator contract the host drives for every LLM engine.
///
/// Every implementation must honor the same output contract: the returned
/// mapping uses the caller's keys, and failed chunks fall back to source text.
#[async_trait]
pub trait MachineTranslator: Send + Sync {
    /// Stable provider identifier for routing and diagnostics.
    fn id(&self) -> ProviderId;

    /// Issues one provider call for an already-chunked list of strings.
    async fn send_request(
        &self,
        source_language: &str,
        target_language: &str,
        strings: &[String],
    ) -> RawResponse;

    /// Translates an arbitrary-size batch through the shared chunk pipeline.
    /// When `source_language_code` is `None` the host's default language is used.
    async fn translate_array(
        &self,
        strings: &TranslationRequest,
        target_language_code: &str,
        source_language_code: Option<&str>,
    ) -> TranslationResult;

    /// Lists chat-capable models with price annotations, cached for a day
    /// unless `force_refresh` is set.
    async fn get_available_models(
        &self,
        api_key: Option<&str>,
        force_refresh: bool,
    ) -> Result<ModelCatalog, CatalogError>;

    /// Verifies the configured key with one small translation round-trip.
    async fn check_api_key_validity(&self) -> ApiKeyStatus;
}

/// One request/response cycle as seen by the chunk pipeline.
#[async_trait]
pub trait ChunkExchange: Send + Sync {
    fn provider(&self) -> ProviderId;

    fn model(&self) -> &str;

    /// Language codes accepted by this provider (ISO-639 prefixes).
    fn supports_language(&self, iso_code: &str) -> bool;

    async fn send_request(
        &self,
        source_language: &str,
        target_language: &str,
        strings: &[String],
    ) -> RawResponse;

    /// Locates the model's text reply inside a decoded response envelope.
    fn reply_text(&self, body: &Value) -> Result<String, ProviderError>;
}

/// Audit and quota collaborator supplied by the host.
pub trait TranslationLogger: Send + Sync {
    fn log(&self, entry: &AuditEntry);

    /// Charges `strings` translated items against the quota.
    fn count_towards_quota(&self, strings: usize);

    fn quota_exceeded(&self) -> bool;
}
