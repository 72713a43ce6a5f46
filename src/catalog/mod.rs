use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::core::types::{ModelCatalog, ProviderId};
use crate::providers;

pub const MODEL_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub fn api_key_digest(api_key: &str) -> String {
    hex::encode(Sha256::digest(api_key.as_bytes()))
}

pub fn cache_key(provider: ProviderId, api_key: Option<&str>) -> String {
    match api_key {
        Some(api_key) if providers::profile(provider).requires_key_for_discovery() => {
            format!("models:{provider}:{}", api_key_digest(api_key))
        }
        _ => format!("models:{provider}"),
    }
}

pub fn default_models(provider: ProviderId) -> ModelCatalog {
    providers::profile(provider).default_models()
}

#[derive(Debug, Clone)]
struct CachedCatalog {
    catalog: ModelCatalog,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct ModelCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CachedCatalog>>,
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCache {
    pub fn new() -> Self {
        Self::with_ttl(MODEL_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<ModelCatalog> {
        let mut entries = self.lock_entries();
        let fresh = entries
            .get(key)
            .map(|entry| entry.stored_at.elapsed() < self.ttl);

        match fresh {
            Some(true) => {
                debug!(cache_key = key, "model cache hit");
                entries.get(key).map(|entry| entry.catalog.clone())
            }
            Some(false) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: impl Into<String>, catalog: ModelCatalog) {
        self.lock_entries().insert(
            key.into(),
            CachedCatalog {
                catalog,
                stored_at: Instant::now(),
            },
        );
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CachedCatalog>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ModelDiscoveryRequest {
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub force_refresh: bool,
}

impl ModelDiscoveryRequest {
    pub fn new(provider: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            provider: provider.into(),
            api_key,
            force_refresh: false,
        }
    }

    pub fn force_refresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelDiscoveryResponse {
    Models { models: IndexMap<String, String> },
    Error { error: String },
}

impl ModelDiscoveryResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<ModelCatalog> for ModelDiscoveryResponse {
    fn from(catalog: ModelCatalog) -> Self {
        Self::Models {
            models: catalog.to_map(),
        }
    }
}
