use crate::core::types::{ModelCatalog, ModelCatalogEntry, ProviderId};
use crate::providers::{AuthScheme, DiscoveryMode, ProviderProfile, WireFormat};

pub const DEFAULT_MODEL: &str = "deepseek-chat";

pub static PROFILE: ProviderProfile = ProviderProfile {
    id: ProviderId::Deepseek,
    default_base_url: "https://api.deepseek.com",
    translate_path: "/chat/completions",
    models_path: None,
    auth: AuthScheme::Bearer,
    wire: WireFormat::ChatCompletions,
    default_model: DEFAULT_MODEL,
    discovery: DiscoveryMode::Static,
    rate_limit_message: super::GENERIC_RATE_LIMIT_MESSAGE,
    reports_insufficient_credits: true,
    sends_site_attribution: false,
};

pub fn default_models() -> ModelCatalog {
    ModelCatalog::new(vec![
        ModelCatalogEntry::new("deepseek-chat", "DeepSeek Chat (Recommended - Best Value)"),
        ModelCatalogEntry::new("deepseek-reasoner", "DeepSeek Reasoner (R1)"),
    ])
}
