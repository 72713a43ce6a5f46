use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationPrompt {
    pub system: String,
    pub user: String,
}

impl TranslationPrompt {
    pub fn new(source_language: &str, target_language: &str, strings: &[String]) -> Self {
        let system = format!(
            "You are a professional translator. Translate the given texts from {source_language} to {target_language}. \
             Maintain the original meaning, tone, and formatting. \
             Preserve any HTML tags, placeholders like %s, %d, or {{{{variables}}}}. \
             Return ONLY a JSON array with the translated strings in the same order as the input. \
             Do not include any explanations or additional text."
        );

        // serde_json leaves non-ASCII characters unescaped.
        let strings_json = serde_json::to_string(strings).unwrap_or_else(|_| "[]".to_string());
        let user = format!("Translate these texts to {target_language}:\n{strings_json}");

        Self { system, user }
    }
}

#[cfg(test)]
mod tests;
