use super::*;

#[test]
fn test_system_prompt_names_both_languages_and_rules() {
    let prompt = TranslationPrompt::new("English", "German", &["Hello".to_string()]);

    assert_eq!(
        prompt.system,
        "You are a professional translator. Translate the given texts from English to German. \
         Maintain the original meaning, tone, and formatting. \
         Preserve any HTML tags, placeholders like %s, %d, or {{variables}}. \
         Return ONLY a JSON array with the translated strings in the same order as the input. \
         Do not include any explanations or additional text."
    );
}

#[test]
fn test_user_prompt_carries_json_array_in_order() {
    let strings = vec!["Hello".to_string(), "World".to_string()];
    let prompt = TranslationPrompt::new("English", "German", &strings);

    assert_eq!(
        prompt.user,
        "Translate these texts to German:\n[\"Hello\",\"World\"]"
    );
}

#[test]
fn test_user_prompt_keeps_unicode_and_escapes_quotes() {
    let strings = vec!["Größe".to_string(), "say \"hi\"".to_string()];
    let prompt = TranslationPrompt::new("German", "Japanese", &strings);

    assert!(prompt.user.ends_with("[\"Größe\",\"say \\\"hi\\\"\"]"));
    assert!(!prompt.user.contains("\\u00f6"));
}
