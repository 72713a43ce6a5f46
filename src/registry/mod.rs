use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{ModelDiscoveryRequest, ModelDiscoveryResponse};
use crate::core::error::RoutingError;
use crate::core::traits::MachineTranslator;
use crate::core::types::ProviderId;
use crate::providers::profile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOption {
    pub value: ProviderId,
    pub label: String,
}

pub fn engines() -> Vec<EngineOption> {
    ProviderId::ALL
        .iter()
        .map(|provider| EngineOption {
            value: *provider,
            label: provider.engine_label().to_string(),
        })
        .collect()
}

#[derive(Default)]
pub struct ProviderRegistry {
    translators: Vec<(ProviderId, Arc<dyn MachineTranslator>)>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, translator: Arc<dyn MachineTranslator>) {
        let provider = translator.id();

        if let Some((_, existing)) = self
            .translators
            .iter_mut()
            .find(|(registered, _)| *registered == provider)
        {
            *existing = translator;
            return;
        }

        self.translators.push((provider, translator));
    }

    pub fn resolve(
        &self,
        provider: ProviderId,
    ) -> Result<Arc<dyn MachineTranslator>, RoutingError> {
        self.translators
            .iter()
            .find(|(registered, _)| *registered == provider)
            .map(|(_, translator)| Arc::clone(translator))
            .ok_or(RoutingError::ProviderNotRegistered { provider })
    }

    pub fn providers(&self) -> Vec<ProviderId> {
        self.translators
            .iter()
            .map(|(provider, _)| *provider)
            .collect()
    }

    pub async fn fetch_models(&self, request: &ModelDiscoveryRequest) -> ModelDiscoveryResponse {
        let provider_value = request.provider.trim();
        if provider_value.is_empty() {
            return ModelDiscoveryResponse::error("Provider is required.");
        }

        let Ok(provider) = provider_value.parse::<ProviderId>() else {
            return ModelDiscoveryResponse::error("Invalid provider.");
        };
        let Ok(translator) = self.resolve(provider) else {
            return ModelDiscoveryResponse::error("Invalid provider.");
        };

        let api_key = request
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());
        let profile = profile(provider);
        if api_key.is_none() && profile.requires_key_for_discovery() {
            return ModelDiscoveryResponse::error(format!(
                "API key is required for {}.",
                profile.display_name()
            ));
        }

        debug!(%provider, force_refresh = request.force_refresh, "fetching models");
        match translator
            .get_available_models(api_key, request.force_refresh)
            .await
        {
            Ok(catalog) => catalog.into(),
            Err(error) => ModelDiscoveryResponse::error(error.to_string()),
        }
    }
}
