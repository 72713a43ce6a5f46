use serde_json::{Value, json};

use crate::core::error::ProviderError;
use crate::core::types::ProviderId;
use crate::prompt::TranslationPrompt;
use crate::providers::translator_contract::ProviderTranslator;

const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Clone, Copy)]
pub(crate) struct MessagesTranslator {
    provider: ProviderId,
}

impl MessagesTranslator {
    pub(crate) fn new(provider: ProviderId) -> Self {
        Self { provider }
    }
}

impl ProviderTranslator for MessagesTranslator {
    fn encode_request(&self, model: &str, prompt: &TranslationPrompt) -> Value {
        json!({
            "model": model,
            "max_tokens": MAX_TOKENS,
            "system": prompt.system,
            "messages": [
                { "role": "user", "content": prompt.user },
            ],
        })
    }

    fn decode_reply_text(&self, body: &Value) -> Result<String, ProviderError> {
        body.pointer("/content/0/text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Protocol {
                provider: self.provider,
                model: body.get("model").and_then(Value::as_str).map(str::to_string),
                request_id: body.get("id").and_then(Value::as_str).map(str::to_string),
                message: "messages response missing content[0].text".to_string(),
            })
    }
}
