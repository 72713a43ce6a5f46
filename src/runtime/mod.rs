use std::sync::Arc;

use tracing::info;

use crate::audit::TracingAuditLog;
use crate::catalog::{ModelCache, ModelDiscoveryRequest, ModelDiscoveryResponse};
use crate::config::Settings;
use crate::core::error::{ConfigError, RoutingError};
use crate::core::traits::{MachineTranslator, TranslationLogger};
use crate::core::types::{ApiKeyStatus, ProviderId, TranslationRequest, TranslationResult};
use crate::pricing::PricingTable;
use crate::providers::LlmTranslator;
use crate::registry::{EngineOption, ProviderRegistry, engines};
use crate::transport::http::{HttpTransport, RetryPolicy, TRANSLATE_TIMEOUT_MS};
use crate::validity::ValidityCache;

pub mod pipeline;

pub struct TranslationRuntime {
    settings: Arc<Settings>,
    registry: ProviderRegistry,
    logger: Arc<dyn TranslationLogger>,
}

pub struct TranslationRuntimeBuilder {
    settings: Settings,
    logger: Option<Arc<dyn TranslationLogger>>,
    base_urls: Vec<(ProviderId, String)>,
    validity_cache: Arc<ValidityCache>,
    model_cache: Arc<ModelCache>,
    retry_policy: RetryPolicy,
    pricing_table: Option<PricingTable>,
    translators: Vec<Arc<dyn MachineTranslator>>,
}

impl TranslationRuntime {
    pub fn builder(settings: Settings) -> TranslationRuntimeBuilder {
        TranslationRuntimeBuilder {
            settings,
            logger: None,
            base_urls: Vec::new(),
            validity_cache: Arc::new(ValidityCache::new()),
            model_cache: Arc::new(ModelCache::new()),
            retry_policy: RetryPolicy::default(),
            pricing_table: None,
            translators: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn engines(&self) -> Vec<EngineOption> {
        engines()
    }

    pub fn translator(
        &self,
        provider: ProviderId,
    ) -> Result<Arc<dyn MachineTranslator>, RoutingError> {
        self.registry.resolve(provider)
    }

    pub fn active_translator(&self) -> Result<Arc<dyn MachineTranslator>, RoutingError> {
        match self.settings.active_engine() {
            Some(provider) if self.settings.is_active(provider) => self.registry.resolve(provider),
            _ => Err(RoutingError::NoActiveEngine),
        }
    }

    pub async fn translate(
        &self,
        strings: &TranslationRequest,
        target_language_code: &str,
        source_language_code: Option<&str>,
    ) -> Result<TranslationResult, RoutingError> {
        let translator = self.active_translator()?;

        if self.logger.quota_exceeded() {
            info!(provider = %translator.id(), strings = strings.len(), "translation quota exhausted; batch skipped");
            return Ok(TranslationResult::new());
        }

        Ok(translator
            .translate_array(strings, target_language_code, source_language_code)
            .await)
    }

    pub async fn fetch_models(&self, request: &ModelDiscoveryRequest) -> ModelDiscoveryResponse {
        self.registry.fetch_models(request).await
    }

    pub async fn check_api_key(&self, provider: ProviderId) -> Result<ApiKeyStatus, RoutingError> {
        let translator = self.registry.resolve(provider)?;
        Ok(translator.check_api_key_validity().await)
    }
}

impl TranslationRuntimeBuilder {
    pub fn with_logger(mut self, logger: Arc<dyn TranslationLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_base_url(mut self, provider: ProviderId, base_url: impl Into<String>) -> Self {
        self.base_urls.retain(|(registered, _)| *registered != provider);
        self.base_urls.push((provider, base_url.into()));
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

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_pricing_table(mut self, pricing_table: PricingTable) -> Self {
        self.pricing_table = Some(pricing_table);
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn MachineTranslator>) -> Self {
        self.translators.push(translator);
        self
    }

    pub fn build(self) -> Result<TranslationRuntime, ConfigError> {
        self.settings.validate()?;
        let settings = Arc::new(self.settings);
        let logger: Arc<dyn TranslationLogger> = match self.logger {
            Some(logger) => logger,
            None => Arc::new(TracingAuditLog::new(settings.quota)),
        };

        let mut registry = ProviderRegistry::new();
        for provider in ProviderId::ALL {
            let config = settings.provider_config(provider)?;
            let transport = HttpTransport::new(TRANSLATE_TIMEOUT_MS, self.retry_policy.clone())?;

            let mut translator =
                LlmTranslator::with_transport(config, Arc::clone(&settings), transport)
                    .with_logger(Arc::clone(&logger))
                    .with_validity_cache(Arc::clone(&self.validity_cache))
                    .with_model_cache(Arc::clone(&self.model_cache));
            if let Some((_, base_url)) = self
                .base_urls
                .iter()
                .find(|(registered, _)| *registered == provider)
            {
                translator = translator.with_base_url(base_url);
            }
            if let Some(pricing_table) = &self.pricing_table {
                translator = translator.with_pricing(pricing_table.clone());
            }

            registry.register(Arc::new(translator));
        }

        for translator in self.translators {
            registry.register(translator);
        }

        Ok(TranslationRuntime {
            settings,
            registry,
            logger,
        })
    }
}
