use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::types::{ModelCatalog, ModelCatalogEntry, ProviderId};
use crate::pricing::PricingTable;
use crate::providers::{AuthScheme, DiscoveryMode, ProviderProfile, WireFormat};

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const API_VERSION: &str = "2023-06-01";

pub static PROFILE: ProviderProfile = ProviderProfile {
    id: ProviderId::Anthropic,
    default_base_url: "https://api.anthropic.com",
    translate_path: "/v1/messages",
    models_path: Some("/v1/models"),
    auth: AuthScheme::ApiKeyHeader {
        version: API_VERSION,
    },
    wire: WireFormat::Messages,
    default_model: DEFAULT_MODEL,
    discovery: DiscoveryMode::KeyRequired,
    rate_limit_message: super::GENERIC_RATE_LIMIT_MESSAGE,
    reports_insufficient_credits: false,
    sends_site_attribution: false,
};

const PREFERRED_PREFIXES: [&str; 6] = [
    "claude-sonnet-4",
    "claude-3-5-sonnet",
    "claude-3-5-haiku",
    "claude-3-opus",
    "claude-3-sonnet",
    "claude-3-haiku",
];

const RECOMMENDED_PREFIX: &str = "claude-3-5-haiku";

pub fn default_models() -> ModelCatalog {
    ModelCatalog::new(vec![
        ModelCatalogEntry::new(
            "claude-3-5-sonnet-20241022",
            "Claude 3.5 Sonnet (Recommended)",
        ),
        ModelCatalogEntry::new("claude-3-5-haiku-20241022", "Claude 3.5 Haiku (Fast)"),
        ModelCatalogEntry::new("claude-3-opus-20240229", "Claude 3 Opus"),
    ])
}

pub(crate) fn decode_models_list(
    payload: &Value,
    pricing: &PricingTable,
) -> Result<ModelCatalog, ProviderError> {
    let data = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Protocol {
            provider: ProviderId::Anthropic,
            model: None,
            request_id: None,
            message: "anthropic models payload missing data array".to_string(),
        })?;

    let mut models: Vec<ModelCatalogEntry> = Vec::with_capacity(data.len());
    for item in data {
        let Some(model_id) = item.get("id").and_then(Value::as_str) else {
            continue;
        };

        let mut label = item
            .get("display_name")
            .and_then(Value::as_str)
            .unwrap_or(model_id)
            .to_string();
        if let Some(price) = pricing.label_for(ProviderId::Anthropic, model_id) {
            label.push_str(" - ");
            label.push_str(&price);
        }
        if model_id.starts_with(RECOMMENDED_PREFIX) {
            label.push_str(" ★");
        }

        // A repeated id replaces the earlier entry, as a keyed map would.
        models.retain(|entry| entry.id != model_id);
        models.push(ModelCatalogEntry::new(model_id, label));
    }

    models.sort_by(|a, b| {
        family_rank(&a.id)
            .cmp(&family_rank(&b.id))
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(ModelCatalog::new(models))
}

fn family_rank(model_id: &str) -> usize {
    PREFERRED_PREFIXES
        .iter()
        .position(|prefix| model_id.starts_with(prefix))
        .unwrap_or(usize::MAX)
}
