const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en_US", "English"),
    ("en_GB", "English (UK)"),
    ("de_DE", "German"),
    ("fr_FR", "French"),
    ("es_ES", "Spanish"),
    ("it_IT", "Italian"),
    ("pt_PT", "Portuguese"),
    ("pt_BR", "Portuguese (Brazil)"),
    ("nl_NL", "Dutch"),
    ("ru_RU", "Russian"),
    ("zh_CN", "Chinese (Simplified)"),
    ("zh_TW", "Chinese (Traditional)"),
    ("ja", "Japanese"),
    ("ko_KR", "Korean"),
    ("ar", "Arabic"),
    ("tr_TR", "Turkish"),
    ("pl_PL", "Polish"),
    ("sv_SE", "Swedish"),
    ("da_DK", "Danish"),
    ("fi", "Finnish"),
    ("no_NO", "Norwegian"),
    ("cs_CZ", "Czech"),
    ("el", "Greek"),
    ("hu_HU", "Hungarian"),
    ("ro_RO", "Romanian"),
    ("uk", "Ukrainian"),
    ("he_IL", "Hebrew"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("id_ID", "Indonesian"),
];

pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "de", "fr", "es", "it", "pt", "nl", "ru", "zh", "ja", "ko", "ar", "tr", "pl", "sv", "da",
    "fi", "no", "cs", "el", "hu", "ro", "uk", "he", "th", "vi", "id", "ms", "hi", "bn", "ta", "te",
    "mr", "gu", "kn", "ml", "pa", "ur", "fa", "af", "sq", "am", "hy", "az", "eu", "be", "bg", "ca",
    "hr", "et", "tl", "gl", "ka", "is", "lv", "lt", "mk", "mt", "mn", "ne", "sr", "sk", "sl", "sw",
    "cy", "yi",
];

pub fn language_name(language_code: &str) -> String {
    if let Some((_, name)) = LANGUAGE_NAMES
        .iter()
        .find(|(code, _)| *code == language_code)
    {
        return (*name).to_string();
    }

    capitalize_first(iso_code(language_code))
}

pub fn iso_code(language_code: &str) -> &str {
    language_code
        .split('_')
        .next()
        .unwrap_or(language_code)
}

pub fn is_supported(language_code: &str) -> bool {
    let iso = iso_code(language_code).to_ascii_lowercase();
    SUPPORTED_LANGUAGES.contains(&iso.as_str())
}

pub fn verify_language_pair(
    source_language_code: &str,
    target_language_code: &str,
    supports: impl Fn(&str) -> bool,
) -> bool {
    let source = source_language_code.trim();
    let target = target_language_code.trim();

    if source.is_empty() || target.is_empty() || source == target {
        return false;
    }

    supports(iso_code(source)) && supports(iso_code(target))
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
