use serde_json::Value;

use crate::core::error::ProviderError;
use crate::core::types::{ModelCatalog, ModelCatalogEntry, ProviderId};
use crate::pricing::PricingTable;
use crate::providers::{AuthScheme, DiscoveryMode, ProviderProfile, WireFormat};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

pub static PROFILE: ProviderProfile = ProviderProfile {
    id: ProviderId::Openai,
    default_base_url: "https://api.openai.com",
    translate_path: "/v1/chat/completions",
    models_path: Some("/v1/models"),
    auth: AuthScheme::Bearer,
    wire: WireFormat::ChatCompletions,
    default_model: DEFAULT_MODEL,
    discovery: DiscoveryMode::KeyRequired,
    rate_limit_message: "Rate limit exceeded or insufficient quota. Please check your OpenAI usage limits.",
    reports_insufficient_credits: false,
    sends_site_attribution: false,
};

const PREFERRED_MODELS: [&str; 7] = [
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
    "o1-mini",
    "o1-preview",
];

const RECOMMENDED_MODEL: &str = "gpt-4o-mini";

pub fn default_models() -> ModelCatalog {
    ModelCatalog::new(vec![
        ModelCatalogEntry::new("gpt-4o-mini", "GPT-4o Mini (Recommended)"),
        ModelCatalogEntry::new("gpt-4o", "GPT-4o"),
        ModelCatalogEntry::new("gpt-4-turbo", "GPT-4 Turbo"),
        ModelCatalogEntry::new("gpt-3.5-turbo", "GPT-3.5 Turbo"),
    ])
}

pub(crate) fn decode_models_list(
    payload: &Value,
    pricing: &PricingTable,
) -> Result<ModelCatalog, ProviderError> {
    let data = payload
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(missing_data_error)?;

    let mut chat_models: Vec<String> = Vec::new();
    for item in data {
        let Some(model_id) = item.get("id").and_then(Value::as_str) else {
            continue;
        };

        if !(model_id.starts_with("gpt-") || model_id.starts_with("o1")) {
            continue;
        }
        if model_id.contains("-instruct") {
            continue;
        }
        if let Some(base) = strip_snapshot_suffix(model_id)
            && chat_models.iter().any(|kept| kept == base)
        {
            continue;
        }

        chat_models.push(model_id.to_string());
    }

    chat_models.sort_by(|a, b| {
        let a_rank = PREFERRED_MODELS.iter().position(|model| model == a);
        let b_rank = PREFERRED_MODELS.iter().position(|model| model == b);
        match (a_rank, b_rank) {
            (Some(a_rank), Some(b_rank)) => a_rank.cmp(&b_rank),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    });

    let models = chat_models
        .into_iter()
        .map(|model_id| {
            let mut label = model_label(&model_id);
            if let Some(price) = pricing.label_for(ProviderId::Openai, &model_id) {
                label.push_str(" - ");
                label.push_str(&price);
            }
            if model_id == RECOMMENDED_MODEL {
                label.push_str(" ★");
            }
            ModelCatalogEntry::new(model_id, label)
        })
        .collect();

    Ok(ModelCatalog::new(models))
}

// gpt-4o-mini -> GPT 4o Mini
fn model_label(model_id: &str) -> String {
    let spaced = model_id.replace("gpt-", "GPT-").replace('-', " ");
    spaced
        .split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn strip_snapshot_suffix(model_id: &str) -> Option<&str> {
    let (base, suffix) = model_id.rsplit_once('-')?;
    if suffix.len() == 4 && suffix.bytes().all(|byte| byte.is_ascii_digit()) {
        Some(base)
    } else {
        None
    }
}

fn missing_data_error() -> ProviderError {
    ProviderError::Protocol {
        provider: ProviderId::Openai,
        model: None,
        request_id: None,
        message: "openai models payload missing data array".to_string(),
    }
}
