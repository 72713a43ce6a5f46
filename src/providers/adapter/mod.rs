use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::audit::TracingAuditLog;
use crate::catalog::{ModelCache, cache_key};
use crate::config::Settings;
use crate::core::error::{CatalogError, ConfigError, ProviderError};
use crate::core::traits::{ChunkExchange, MachineTranslator, TranslationLogger};
use crate::core::types::{
    AdapterContext, ApiKeyStatus, ModelCatalog, ProviderConfig, ProviderId, RawResponse,
    TranslationRequest, TranslationResult,
};
use crate::language::is_supported;
use crate::pricing::{PricingTable, builtin_pricing_table};
use crate::prompt::TranslationPrompt;
use crate::providers::translator_contract::ProviderTranslator;
use crate::providers::{DiscoveryMode, ProviderProfile, normalize_base_url, profile};
use crate::runtime::pipeline;
use crate::transport::http::{
    CUSTOM_HEADER_PREFIX, DISCOVERY_TIMEOUT_MS, HttpTransport, RetryPolicy, TRANSLATE_TIMEOUT_MS,
};
use crate::validity::ValidityCache;

const KEY_CHECK_SOURCE_LANGUAGE: &str = "English";
const KEY_CHECK_TARGET_LANGUAGE: &str = "Spanish";
const KEY_CHECK_TEXT: &str = "Hello, how are you?";

/// One LLM engine: a provider profile bound to its configuration, transport
/// and collaborators.
pub struct LlmTranslator {
    profile: &'static ProviderProfile,
    config: ProviderConfig,
    settings: Arc<Settings>,
    transport: HttpTransport,
    translator: Box<dyn ProviderTranslator + Send + Sync>,
    base_url: String,
    logger: Arc<dyn TranslationLogger>,
    validity_cache: Arc<ValidityCache>,
    model_cache: Arc<ModelCache>,
    pricing: PricingTable,
}

impl LlmTranslator {
    pub fn new(config: ProviderConfig, settings: Arc<Settings>) -> Result<Self, ConfigError> {
        let transport = HttpTransport::new(TRANSLATE_TIMEOUT_MS, RetryPolicy::default())?;
        Ok(Self::with_transport(config, settings, transport))
    }

    pub fn from_settings(provider: ProviderId, settings: Arc<Settings>) -> Result<Self, ConfigError> {
        let config = settings.provider_config(provider)?;
        Self::new(config, settings)
    }

    pub fn with_transport(
        config: ProviderConfig,
        settings: Arc<Settings>,
        transport: HttpTransport,
    ) -> Self {
        let profile = profile(config.provider);
        let logger: Arc<dyn TranslationLogger> = Arc::new(TracingAuditLog::new(settings.quota));

        Self {
            profile,
            config,
            settings,
            transport,
            translator: profile.translator(),
            base_url: profile.default_base_url.to_string(),
            logger,
            validity_cache: Arc::new(ValidityCache::new()),
            model_cache: Arc::new(ModelCache::new()),
            pricing: builtin_pricing_table(),
        }
    }

    /// Points the engine at another host. Blank input restores the default.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = normalize_base_url(base_url.as_ref(), self.profile.default_base_url);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranslationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_validity_cache(mut self, cache: Arc<ValidityCache>) -> Self {
        self.validity_cache = cache;
        self
    }

    pub fn with_model_cache(mut self, cache: Arc<ModelCache>) -> Self {
        self.model_cache = cache;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn profile(&self) -> &'static ProviderProfile {
        self.profile
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn translate_url(&self) -> String {
        format!("{}{}", self.base_url, self.profile.translate_path)
    }

    fn models_url(&self) -> Option<String> {
        self.profile
            .models_path
            .map(|path| format!("{}{path}", self.base_url))
    }

    fn translate_context(&self) -> AdapterContext {
        let mut ctx = self.profile.auth_context(self.config.api_key());

        if self.profile.sends_site_attribution {
            let attribution = [
                ("http-referer", self.settings.site_url.as_deref()),
                ("x-title", self.settings.site_name.as_deref()),
            ];
            for (header, value) in attribution {
                if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
                    ctx.metadata
                        .insert(format!("{CUSTOM_HEADER_PREFIX}{header}"), value.to_string());
                }
            }
        }

        ctx
    }

    async fn exchange(
        &self,
        source_language: &str,
        target_language: &str,
        strings: &[String],
    ) -> RawResponse {
        let prompt = TranslationPrompt::new(source_language, target_language, strings);
        let body = self.translator.encode_request(&self.config.model, &prompt);

        match self
            .transport
            .post_json(
                self.profile.id,
                Some(&self.config.model),
                &self.translate_url(),
                &body,
                &self.translate_context(),
            )
            .await
        {
            Ok(reply) => reply.into(),
            Err(error) => RawResponse::Transport {
                message: error.message().to_string(),
            },
        }
    }

    fn static_models(&self) -> ModelCatalog {
        self.profile
            .default_models()
            .with_saved_model(&self.config.model)
    }

    async fn fetch_models(&self, api_key: Option<&str>) -> Result<ModelCatalog, CatalogError> {
        let provider = self.profile.id;
        let Some(url) = self.models_url() else {
            return Ok(self.static_models());
        };

        let reply = self
            .transport
            .get(
                provider,
                &url,
                &self.profile.auth_context(api_key),
                DISCOVERY_TIMEOUT_MS,
            )
            .await?
            .error_for_status(provider, None)?;
        let payload: Value = reply.json(provider, None)?;
        let catalog = self.profile.decode_models(&payload, &self.pricing)?;

        info!(%provider, models = catalog.len(), "discovered provider models");
        Ok(catalog)
    }
}

#[async_trait]
impl ChunkExchange for LlmTranslator {
    fn provider(&self) -> ProviderId {
        self.profile.id
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn supports_language(&self, iso_code: &str) -> bool {
        is_supported(iso_code)
    }

    async fn send_request(
        &self,
        source_language: &str,
        target_language: &str,
        strings: &[String],
    ) -> RawResponse {
        self.exchange(source_language, target_language, strings).await
    }

    fn reply_text(&self, body: &Value) -> Result<String, ProviderError> {
        self.translator.decode_reply_text(body)
    }
}

#[async_trait]
impl MachineTranslator for LlmTranslator {
    fn id(&self) -> ProviderId {
        self.profile.id
    }

    async fn send_request(
        &self,
        source_language: &str,
        target_language: &str,
        strings: &[String],
    ) -> RawResponse {
        self.exchange(source_language, target_language, strings).await
    }

    async fn translate_array(
        &self,
        strings: &TranslationRequest,
        target_language_code: &str,
        source_language_code: Option<&str>,
    ) -> TranslationResult {
        let source_language_code =
            source_language_code.unwrap_or(self.settings.default_language.as_str());

        pipeline::translate_array(
            self,
            self.logger.as_ref(),
            strings,
            source_language_code,
            target_language_code,
            self.config.chunk_size,
        )
        .await
    }

    async fn get_available_models(
        &self,
        api_key: Option<&str>,
        force_refresh: bool,
    ) -> Result<ModelCatalog, CatalogError> {
        let provider = self.profile.id;
        let api_key = api_key.map(str::trim).filter(|key| !key.is_empty());

        match self.profile.discovery {
            DiscoveryMode::Static => return Ok(self.static_models()),
            DiscoveryMode::KeyRequired if api_key.is_none() => {
                return Err(CatalogError::MissingApiKey { provider });
            }
            DiscoveryMode::KeyRequired | DiscoveryMode::KeyOptional => {}
        }

        let key = cache_key(provider, api_key);
        if !force_refresh && let Some(catalog) = self.model_cache.get(&key) {
            debug!(%provider, "model catalog served from cache");
            return Ok(catalog);
        }

        match self.fetch_models(api_key).await {
            Ok(catalog) => {
                self.model_cache.insert(key, catalog.clone());
                Ok(catalog)
            }
            Err(error) => {
                warn!(%provider, error = %error, "model discovery failed");
                Err(error)
            }
        }
    }

    async fn check_api_key_validity(&self) -> ApiKeyStatus {
        let provider = self.profile.id;
        if !self.settings.is_active(provider) {
            return ApiKeyStatus::valid();
        }

        let Some(api_key) = self.config.api_key() else {
            return ApiKeyStatus::invalid(self.profile.missing_key_message());
        };

        if let Some(status) = self.validity_cache.get(provider, api_key) {
            return status;
        }

        let probe = [KEY_CHECK_TEXT.to_string()];
        let response = self
            .exchange(KEY_CHECK_SOURCE_LANGUAGE, KEY_CHECK_TARGET_LANGUAGE, &probe)
            .await;
        let status = match &response {
            response if response.is_ok() => ApiKeyStatus::valid(),
            RawResponse::Http {
                status_code, body, ..
            } => ApiKeyStatus::invalid(self.profile.error_message(*status_code, body)),
            RawResponse::Transport { message } => {
                ApiKeyStatus::invalid(self.profile.transport_error_message(message))
            }
        };

        if status.error {
            warn!(%provider, message = %status.message, "api key check failed");
        }
        // Outages and rate limits say nothing about the key itself.
        if !is_transient_failure(&response) {
            self.validity_cache.insert(provider, api_key, status.clone());
        }
        status
    }
}

fn is_transient_failure(response: &RawResponse) -> bool {
    match response {
        RawResponse::Transport { .. } => true,
        RawResponse::Http { status_code, .. } => *status_code == 429 || *status_code >= 500,
    }
}
