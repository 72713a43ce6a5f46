use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::catalog::api_key_digest;
use crate::core::types::{ApiKeyStatus, ProviderId};

pub const VALIDITY_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
struct CachedStatus {
    status: ApiKeyStatus,
    checked_at: Instant,
}

#[derive(Debug)]
pub struct ValidityCache {
    ttl: Duration,
    entries: Mutex<HashMap<(ProviderId, String), CachedStatus>>,
}

impl Default for ValidityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidityCache {
    pub fn new() -> Self {
        Self::with_ttl(VALIDITY_CACHE_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, provider: ProviderId, api_key: &str) -> Option<ApiKeyStatus> {
        let key = (provider, api_key_digest(api_key));
        let mut entries = self.lock_entries();

        let fresh = entries
            .get(&key)
            .map(|entry| entry.checked_at.elapsed() < self.ttl);

        match fresh {
            Some(true) => {
                debug!(%provider, "api key status served from cache");
                entries.get(&key).map(|entry| entry.status.clone())
            }
            Some(false) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, provider: ProviderId, api_key: &str, status: ApiKeyStatus) {
        self.lock_entries().insert(
            (provider, api_key_digest(api_key)),
            CachedStatus {
                status,
                checked_at: Instant::now(),
            },
        );
    }

    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<(ProviderId, String), CachedStatus>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
