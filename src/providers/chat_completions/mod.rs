use serde_json::{Value, json};

use crate::core::error::ProviderError;
use crate::core::types::ProviderId;
use crate::prompt::TranslationPrompt;
use crate::providers::translator_contract::ProviderTranslator;

const TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
pub(crate) struct ChatCompletionsTranslator {
    provider: ProviderId,
}

impl ChatCompletionsTranslator {
    pub(crate) fn new(provider: ProviderId) -> Self {
        Self { provider }
    }
}

impl ProviderTranslator for ChatCompletionsTranslator {
    fn encode_request(&self, model: &str, prompt: &TranslationPrompt) -> Value {
        json!({
            "model": model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
            "temperature": TEMPERATURE,
        })
    }

    fn decode_reply_text(&self, body: &Value) -> Result<String, ProviderError> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::Protocol {
                provider: self.provider,
                model: body.get("model").and_then(Value::as_str).map(str::to_string),
                request_id: body.get("id").and_then(Value::as_str).map(str::to_string),
                message: "chat completion missing choices[0].message.content".to_string(),
            })
    }
}
