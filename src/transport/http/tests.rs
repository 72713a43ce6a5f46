use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::json;

use crate::core::error::{ConfigError, ProviderError};
use crate::core::types::{AdapterContext, ProviderId, RawResponse};
use crate::test_support::{MockResponse, MockServer};
use crate::transport::http::{DISCOVERY_TIMEOUT_MS, HttpTransport, RetryPolicy};

#[derive(Debug, Deserialize, PartialEq, Eq)]
struct OkResponse {
    ok: bool,
}

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_backoff_ms: 0,
        max_backoff_ms: 0,
        retryable_status_codes: vec![429, 503],
    }
}

#[tokio::test]
async fn test_http_transport_returns_non_success_replies_verbatim() {
    let mut server = MockServer::start(vec![
        MockResponse::new(429, r#"{"error":{"message":"slow down"}}"#)
            .with_header("x-request-id", "req-123"),
    ]);

    let transport = HttpTransport::new(1_000, RetryPolicy::none()).expect("create transport");
    let reply = transport
        .post_json(
            ProviderId::Openai,
            Some("gpt-4o-mini"),
            &format!("{}/v1/chat/completions", server.url()),
            &json!({"ping": true}),
            &AdapterContext::default(),
        )
        .await
        .expect("non-200 is not a transport error");

    assert_eq!(reply.status_code, 429);
    assert_eq!(reply.request_id, Some("req-123".to_string()));
    assert!(!reply.is_success());

    let raw = RawResponse::from(reply.clone());
    assert_eq!(raw.status_code(), Some(429));

    match reply.error_for_status(ProviderId::Openai, Some("gpt-4o-mini")) {
        Err(ProviderError::Status {
            provider,
            model,
            status_code,
            request_id,
            message,
        }) => {
            assert_eq!(provider, ProviderId::Openai);
            assert_eq!(model, Some("gpt-4o-mini".to_string()));
            assert_eq!(status_code, 429);
            assert_eq!(request_id, Some("req-123".to_string()));
            assert!(message.contains("slow down"));
        }
        other => panic!("expected ProviderError::Status, got {other:?}"),
    }

    server.shutdown();
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_default_policy_never_retries() {
    let mut server = MockServer::start(vec![MockResponse::new(503, "")]);

    let transport = HttpTransport::new(1_000, RetryPolicy::default()).expect("create transport");
    let reply = transport
        .get(
            ProviderId::Openrouter,
            &format!("{}/api/v1/models", server.url()),
            &AdapterContext::default(),
            DISCOVERY_TIMEOUT_MS,
        )
        .await
        .expect("reply");

    assert_eq!(reply.status_code, 503);
    let err = reply
        .error_for_status(ProviderId::Openrouter, None)
        .expect_err("503 is an error status");
    assert!(err.to_string().contains("http status 503"));

    server.shutdown();
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_mock_server_stops_with_unserved_replies() {
    let mut server = MockServer::start(vec![
        MockResponse::new(200, r#"{"ok":true}"#),
        MockResponse::new(200, r#"{"ok":true}"#),
    ]);

    let transport = HttpTransport::new(1_000, RetryPolicy::none()).expect("create transport");
    let reply = transport
        .get(
            ProviderId::Openai,
            &format!("{}/v1/models", server.url()),
            &AdapterContext::default(),
            DISCOVERY_TIMEOUT_MS,
        )
        .await
        .expect("reply");
    assert!(reply.is_success());

    let started = std::time::Instant::now();
    server.shutdown();
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn test_bounded_retry_policy_retries_retryable_statuses() {
    let mut server = MockServer::start(vec![
        MockResponse::new(429, r#"{"error":"retry"}"#),
        MockResponse::new(503, r#"{"error":"retry"}"#),
        MockResponse::new(200, r#"{"ok":true}"#),
    ]);

    let transport = HttpTransport::new(1_000, fast_retry(3)).expect("create transport");
    let reply = transport
        .get(
            ProviderId::Anthropic,
            &format!("{}/v1/models", server.url()),
            &AdapterContext::default(),
            1_000,
        )
        .await
        .expect("reply");

    assert!(reply.is_success());
    let parsed: OkResponse = reply
        .json(ProviderId::Anthropic, None)
        .expect("json body");
    assert_eq!(parsed, OkResponse { ok: true });

    server.shutdown();
    assert_eq!(server.request_count(), 3);
}

#[tokio::test]
async fn test_http_transport_injects_auth_and_custom_headers() {
    let mut server = MockServer::start(vec![MockResponse::new(200, r#"{"ok":true}"#)]);

    let transport = HttpTransport::new(1_000, RetryPolicy::none()).expect("create transport");

    let mut metadata = BTreeMap::new();
    metadata.insert(
        "transport.auth.bearer_token".to_string(),
        "token-abc".to_string(),
    );
    metadata.insert(
        "transport.header.x-title".to_string(),
        "My Site".to_string(),
    );
    let ctx = AdapterContext { metadata };

    transport
        .post_json(
            ProviderId::Openrouter,
            Some("openai/gpt-4o-mini"),
            &format!("{}/headers", server.url()),
            &json!({"ping": true}),
            &ctx,
        )
        .await
        .expect("successful response");

    server.shutdown();
    let captured = server.captured();
    assert_eq!(captured.len(), 1);
    let first = &captured[0];
    assert_eq!(first.method, "POST");
    assert_eq!(first.header("authorization"), Some("Bearer token-abc"));
    assert_eq!(first.header("x-title"), Some("My Site"));
    assert_eq!(first.header("content-type"), Some("application/json"));
    assert_eq!(first.json(), json!({"ping": true}));
}

#[tokio::test]
async fn test_transport_failure_is_reported_as_transport_error() {
    let transport = HttpTransport::new(500, RetryPolicy::none()).expect("create transport");
    let err = transport
        .post_json(
            ProviderId::Deepseek,
            Some("deepseek-chat"),
            "http://127.0.0.1:1/chat/completions",
            &json!({}),
            &AdapterContext::default(),
        )
        .await
        .expect_err("nothing listens on port 1");

    assert!(matches!(
        err,
        ProviderError::Transport {
            provider: ProviderId::Deepseek,
            ..
        }
    ));
}

#[tokio::test]
async fn test_invalid_header_value_is_protocol_error() {
    let transport = HttpTransport::new(500, RetryPolicy::none()).expect("create transport");
    let mut metadata = BTreeMap::new();
    metadata.insert(
        "transport.auth.bearer_token".to_string(),
        "bad\nkey".to_string(),
    );

    let err = transport
        .get(
            ProviderId::Openai,
            "http://127.0.0.1:1/v1/models",
            &AdapterContext { metadata },
            500,
        )
        .await
        .expect_err("newline in header");
    assert!(matches!(err, ProviderError::Protocol { .. }));
}

#[test]
fn test_retry_policy_validation() {
    assert!(RetryPolicy::none().validate().is_ok());
    assert_eq!(RetryPolicy::none().max_attempts, 1);
    assert_eq!(RetryPolicy::bounded(3).max_attempts, 3);

    let zero = RetryPolicy {
        max_attempts: 0,
        ..RetryPolicy::default()
    };
    assert!(matches!(
        zero.validate(),
        Err(ConfigError::InvalidRetryPolicy { .. })
    ));

    let unauthorized = RetryPolicy {
        retryable_status_codes: vec![401],
        ..RetryPolicy::bounded(2)
    };
    assert!(matches!(
        unauthorized.validate(),
        Err(ConfigError::InvalidRetryPolicy { .. })
    ));

    assert_eq!(
        HttpTransport::new(0, RetryPolicy::none()).err(),
        Some(ConfigError::InvalidTimeout { timeout_ms: 0 })
    );
}

#[test]
fn test_backoff_is_exponential_and_capped() {
    let policy = RetryPolicy {
        max_attempts: 5,
        initial_backoff_ms: 100,
        max_backoff_ms: 350,
        retryable_status_codes: vec![429],
    };

    assert_eq!(policy.backoff_duration_for_retry(0).as_millis(), 100);
    assert_eq!(policy.backoff_duration_for_retry(1).as_millis(), 200);
    assert_eq!(policy.backoff_duration_for_retry(2).as_millis(), 350);
    assert_eq!(policy.backoff_duration_for_retry(40).as_millis(), 350);
}
