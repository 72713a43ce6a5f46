use serde_json::Value;

use crate::core::error::ProviderError;
use crate::prompt::TranslationPrompt;

/// Wire-format contract shared by every provider profile.
///
/// Implementations turn a translation prompt into the provider's request
/// envelope and locate the reply text inside a decoded response envelope.
pub(crate) trait ProviderTranslator {
    fn encode_request(&self, model: &str, prompt: &TranslationPrompt) -> Value;

    fn decode_reply_text(&self, body: &Value) -> Result<String, ProviderError>;
}
