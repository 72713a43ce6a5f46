use std::sync::Arc;

use llm_translate::audit::{MemoryAuditLog, TracingAuditLog};
use llm_translate::catalog::{ModelCache, ModelDiscoveryRequest, ModelDiscoveryResponse};
use llm_translate::config::Settings;
use llm_translate::core::error::{CatalogError, ConfigError, ProviderError, RoutingError};
use llm_translate::core::traits::{ChunkExchange, MachineTranslator, TranslationLogger};
use llm_translate::core::types::{ApiKeyStatus, ProviderConfig, ProviderId};
use llm_translate::language::language_name;
use llm_translate::parser::parse_translation_response;
use llm_translate::pricing::builtin_pricing_table;
use llm_translate::providers::profile;
use llm_translate::registry::engines;
use llm_translate::transport::http::{HttpTransport, RetryPolicy};
use llm_translate::validity::ValidityCache;
use llm_translate::{LlmTranslator, TranslationRequest, TranslationRuntime, TranslationRuntimeBuilder};

fn assert_machine_translator<T: MachineTranslator + ChunkExchange>(_: &T) {}

#[test]
fn test_public_api_compiles() {
    let _builder: TranslationRuntimeBuilder = TranslationRuntime::builder(Settings::default());
    let runtime = TranslationRuntime::builder(Settings::default())
        .with_logger(Arc::new(TracingAuditLog::unlimited()))
        .with_model_cache(Arc::new(ModelCache::new()))
        .with_validity_cache(Arc::new(ValidityCache::new()))
        .with_retry_policy(RetryPolicy::none())
        .with_pricing_table(builtin_pricing_table())
        .build()
        .expect("runtime should build from default settings");
    assert_eq!(runtime.engines(), engines());

    let config = ProviderConfig::new(ProviderId::Deepseek, Some("sk".to_string()), "deepseek-chat");
    let transport = HttpTransport::new(1_000, RetryPolicy::none()).expect("transport");
    let translator = LlmTranslator::with_transport(config, Arc::new(Settings::default()), transport)
        .with_logger(Arc::new(MemoryAuditLog::default()));
    assert_machine_translator(&translator);
    assert_eq!(translator.profile(), profile(ProviderId::Deepseek));

    let _request: TranslationRequest = TranslationRequest::new();
    let _discovery = ModelDiscoveryRequest::new("openai", None).force_refresh();
    let _response: ModelDiscoveryResponse = ModelDiscoveryResponse::error("x");
    let _status: ApiKeyStatus = ApiKeyStatus::valid();
    let _logger: Arc<dyn TranslationLogger> = Arc::new(MemoryAuditLog::new(Some(10)));

    let _errors: (
        Option<ConfigError>,
        Option<ProviderError>,
        Option<CatalogError>,
        Option<RoutingError>,
    ) = (None, None, None, None);

    assert_eq!(language_name("pt_BR"), "Portuguese (Brazil)");
    assert_eq!(parse_translation_response("[\"a\"]"), vec!["a".to_string()]);
}
