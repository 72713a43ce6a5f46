use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::types::{ModelCatalog, ModelCatalogEntry, ProviderId};
use crate::pricing::per_token_price_label;
use crate::providers::{AuthScheme, DiscoveryMode, ProviderProfile, WireFormat};

pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

pub static PROFILE: ProviderProfile = ProviderProfile {
    id: ProviderId::Openrouter,
    default_base_url: "https://openrouter.ai",
    translate_path: "/api/v1/chat/completions",
    models_path: Some("/api/v1/models"),
    auth: AuthScheme::Bearer,
    wire: WireFormat::ChatCompletions,
    default_model: DEFAULT_MODEL,
    discovery: DiscoveryMode::KeyOptional,
    rate_limit_message: super::GENERIC_RATE_LIMIT_MESSAGE,
    reports_insufficient_credits: true,
    sends_site_attribution: true,
};

const PREFERRED_VENDORS: [&str; 6] = [
    "anthropic",
    "openai",
    "google",
    "meta-llama",
    "mistralai",
    "deepseek",
];

const MIN_CONTEXT_LENGTH: u64 = 4000;

pub fn default_models() -> ModelCatalog {
    ModelCatalog::new(vec![
        ModelCatalogEntry::new(
            "anthropic/claude-3.5-sonnet",
            "Claude 3.5 Sonnet (Recommended)",
        ),
        ModelCatalogEntry::new("openai/gpt-4o-mini", "GPT-4o Mini"),
        ModelCatalogEntry::new("openai/gpt-4o", "GPT-4o"),
        ModelCatalogEntry::new("google/gemini-2.0-flash-exp", "Gemini 2.0 Flash"),
        ModelCatalogEntry::new("google/gemini-pro-1.5", "Gemini Pro 1.5"),
        ModelCatalogEntry::new("meta-llama/llama-3.1-70b-instruct", "Llama 3.1 70B"),
        ModelCatalogEntry::new("mistralai/mistral-large", "Mistral Large"),
        ModelCatalogEntry::new("deepseek/deepseek-chat", "DeepSeek Chat"),
    ])
}

struct ListedModel {
    id: String,
    name: String,
    vendor_rank: usize,
    prompt_price: f64,
    completion_price: f64,
}

/// Known vendors with at least a 4k context window, grouped by vendor and
/// cheapest first.
pub(crate) fn decode_models_list(payload: &Value) -> Result<ModelCatalog, ProviderError> {
    let data = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Protocol {
            provider: ProviderId::Openrouter,
            model: None,
            request_id: None,
            message: "openrouter models payload missing data array".to_string(),
        })?;

    let mut listed = Vec::new();
    for item in data {
        let Some(model_id) = item.get("id").and_then(Value::as_str) else {
            continue;
        };

        let vendor = model_id.split('/').next().unwrap_or(model_id);
        let Some(vendor_rank) = PREFERRED_VENDORS.iter().position(|known| *known == vendor)
        else {
            continue;
        };

        let context_length = item
            .get("context_length")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        if context_length < MIN_CONTEXT_LENGTH as f64 {
            continue;
        }

        let pricing = item.get("pricing");
        listed.push(ListedModel {
            id: model_id.to_string(),
            name: item
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(model_id)
                .to_string(),
            vendor_rank,
            prompt_price: price_field(pricing, "prompt"),
            completion_price: price_field(pricing, "completion"),
        });
    }

    // `sort_by` is stable, so ties keep listing order.
    listed.sort_by(|a, b| {
        a.vendor_rank.cmp(&b.vendor_rank).then_with(|| {
            a.prompt_price
                .partial_cmp(&b.prompt_price)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    let models = listed
        .into_iter()
        .map(|model| {
            let price = per_token_price_label(model.prompt_price, model.completion_price);
            ModelCatalogEntry::new(model.id, format!("{} - {price}", model.name))
        })
        .collect();

    Ok(ModelCatalog::new(models))
}

fn price_field(pricing: Option<&Value>, field: &str) -> f64 {
    let Some(value) = pricing.and_then(|pricing| pricing.get(field)) else {
        return 0.0;
    };

    match value {
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        _ => 0.0,
    }
}
