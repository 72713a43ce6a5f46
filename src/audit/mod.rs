use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::info;

use crate::core::traits::TranslationLogger;
use crate::core::types::AuditEntry;

pub const AUDIT_TARGET: &str = "llm_translate::audit";

#[derive(Debug, Default)]
struct QuotaCounter {
    limit: Option<u64>,
    used: AtomicU64,
}

impl QuotaCounter {
    fn new(limit: Option<u64>) -> Self {
        Self {
            limit,
            used: AtomicU64::new(0),
        }
    }

    fn charge(&self, strings: usize) {
        let strings = u64::try_from(strings).unwrap_or(u64::MAX);
        self.used.fetch_add(strings, Ordering::SeqCst);
    }

    fn used(&self) -> u64 {
        self.used.load(Ordering::SeqCst)
    }

    fn exceeded(&self) -> bool {
        self.limit.is_some_and(|limit| self.used() >= limit)
    }
}

#[derive(Debug, Default)]
pub struct TracingAuditLog {
    quota: QuotaCounter,
}

impl TracingAuditLog {
    pub fn new(quota: Option<u64>) -> Self {
        Self {
            quota: QuotaCounter::new(quota),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub fn used(&self) -> u64 {
        self.quota.used()
    }
}

impl TranslationLogger for TracingAuditLog {
    fn log(&self, entry: &AuditEntry) {
        info!(
            target: AUDIT_TARGET,
            provider = %entry.provider,
            model = %entry.model,
            lang_source = %entry.lang_source,
            lang_target = %entry.lang_target,
            strings = entry.strings.len(),
            outcome = ?entry.outcome,
            response = %entry.response,
            "translation exchange"
        );
    }

    fn count_towards_quota(&self, strings: usize) {
        self.quota.charge(strings);
    }

    fn quota_exceeded(&self) -> bool {
        self.quota.exceeded()
    }
}

#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
    quota: QuotaCounter,
}

impl MemoryAuditLog {
    pub fn new(quota: Option<u64>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            quota: QuotaCounter::new(quota),
        }
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.lock_entries().clone()
    }

    pub fn used(&self) -> u64 {
        self.quota.used()
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<AuditEntry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TranslationLogger for MemoryAuditLog {
    fn log(&self, entry: &AuditEntry) {
        self.lock_entries().push(entry.clone());
    }

    fn count_towards_quota(&self, strings: usize) {
        self.quota.charge(strings);
    }

    fn quota_exceeded(&self) -> bool {
        self.quota.exceeded()
    }
}

#[cfg(test)]
mod tests;
