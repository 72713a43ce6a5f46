use super::*;

const ERROR_BODY: &str = r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#;

#[test]
fn test_profile_lookup_matches_provider() {
    for provider in ProviderId::ALL {
        assert_eq!(profile(provider).id, provider);
    }
}

#[test]
fn test_openai_error_table() {
    let openai = profile(ProviderId::Openai);
    assert_eq!(
        openai.error_message(401, ""),
        "Invalid API key. Please check your OpenAI API key."
    );
    assert_eq!(
        openai.error_message(429, ""),
        "Rate limit exceeded or insufficient quota. Please check your OpenAI usage limits."
    );
    assert_eq!(
        openai.error_message(402, ERROR_BODY),
        "OpenAI API error (code 402): model not found"
    );
    assert_eq!(
        openai.error_message(503, ""),
        "OpenAI service temporarily unavailable. Please try again later."
    );
    assert_eq!(
        openai.error_message(404, ERROR_BODY),
        "OpenAI API error (code 404): model not found"
    );
}

#[test]
fn test_anthropic_error_table() {
    let anthropic = profile(ProviderId::Anthropic);
    assert_eq!(
        anthropic.error_message(401, ""),
        "Invalid API key. Please check your Anthropic API key."
    );
    assert_eq!(
        anthropic.error_message(429, ""),
        "Rate limit exceeded. Please try again later."
    );
    assert_eq!(
        anthropic.error_message(402, "not json"),
        "Anthropic API error (code 402): "
    );
    assert_eq!(
        anthropic.error_message(500, ""),
        "Anthropic service temporarily unavailable. Please try again later."
    );
}

#[test]
fn test_credit_reporting_providers_map_402() {
    assert_eq!(
        profile(ProviderId::Openrouter).error_message(402, ""),
        "Insufficient credits. Please add credits to your OpenRouter account."
    );
    assert_eq!(
        profile(ProviderId::Deepseek).error_message(402, ""),
        "Insufficient credits. Please add credits to your DeepSeek account."
    );
    assert_eq!(
        profile(ProviderId::Deepseek).error_message(429, ""),
        "Rate limit exceeded. Please try again later."
    );
    assert_eq!(
        profile(ProviderId::Openrouter).error_message(400, ERROR_BODY),
        "OpenRouter API error (code 400): model not found"
    );
}

#[test]
fn test_transport_and_missing_key_messages() {
    let deepseek = profile(ProviderId::Deepseek);
    assert_eq!(
        deepseek.transport_error_message("connection refused"),
        "DeepSeek API error (code 0): connection refused"
    );
    assert_eq!(
        deepseek.missing_key_message(),
        "Please enter your DeepSeek API key."
    );
}

#[test]
fn test_auth_context_per_scheme() {
    let bearer = profile(ProviderId::Openai).auth_context(Some("sk-test"));
    assert_eq!(
        bearer.metadata.get(AUTH_BEARER_TOKEN_KEY).map(String::as_str),
        Some("sk-test")
    );

    let anonymous = profile(ProviderId::Openrouter).auth_context(None);
    assert!(anonymous.metadata.is_empty());

    let anthropic = profile(ProviderId::Anthropic).auth_context(Some("sk-ant"));
    assert_eq!(
        anthropic
            .metadata
            .get("transport.header.x-api-key")
            .map(String::as_str),
        Some("sk-ant")
    );
    assert_eq!(
        anthropic
            .metadata
            .get("transport.header.anthropic-version")
            .map(String::as_str),
        Some("2023-06-01")
    );
    assert!(!anthropic.metadata.contains_key(AUTH_BEARER_TOKEN_KEY));
}

#[test]
fn test_normalize_base_url() {
    assert_eq!(
        normalize_base_url("http://127.0.0.1:9/", "https://x"),
        "http://127.0.0.1:9"
    );
    assert_eq!(normalize_base_url("  ", "https://x"), "https://x");
}

#[test]
fn test_discovery_modes() {
    assert!(profile(ProviderId::Openai).requires_key_for_discovery());
    assert!(profile(ProviderId::Anthropic).requires_key_for_discovery());
    assert!(!profile(ProviderId::Openrouter).requires_key_for_discovery());
    assert_eq!(profile(ProviderId::Deepseek).discovery, DiscoveryMode::Static);
}
