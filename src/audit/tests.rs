use indexmap::IndexMap;

use super::*;
use crate::core::types::{ChunkOutcome, ProviderId, RawResponse};

fn entry() -> AuditEntry {
    let mut strings = IndexMap::new();
    strings.insert("k1".to_string(), "Hello".to_string());

    AuditEntry {
        provider: ProviderId::Deepseek,
        model: "deepseek-chat".to_string(),
        lang_source: "English".to_string(),
        lang_target: "German".to_string(),
        strings,
        response: RawResponse::Transport {
            message: "timeout".to_string(),
        }
        .to_log_string(),
        outcome: ChunkOutcome::Transport {
            message: "timeout".to_string(),
        },
    }
}

#[test]
fn test_unlimited_quota_is_never_exceeded() {
    let log = TracingAuditLog::unlimited();
    log.log(&entry());
    log.count_towards_quota(10_000);

    assert_eq!(log.used(), 10_000);
    assert!(!log.quota_exceeded());
}

#[test]
fn test_quota_is_exceeded_once_reached() {
    let log = TracingAuditLog::new(Some(5));
    log.count_towards_quota(3);
    assert!(!log.quota_exceeded());

    log.count_towards_quota(2);
    assert!(log.quota_exceeded());
}

#[test]
fn test_memory_log_records_entries_in_order() {
    let log = MemoryAuditLog::new(Some(1));
    let first = entry();
    let mut second = entry();
    second.lang_target = "French".to_string();

    log.log(&first);
    log.log(&second);
    log.count_towards_quota(1);

    let entries = log.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0], first);
    assert_eq!(entries[1].lang_target, "French");
    assert!(log.quota_exceeded());
    assert_eq!(log.used(), 1);
}

#[test]
fn test_logger_is_object_safe() {
    let log: Box<dyn TranslationLogger> = Box::new(MemoryAuditLog::default());
    log.log(&entry());
    assert!(!log.quota_exceeded());
}
