use serde_json::Value;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Extracts the translated strings from a model reply, fenced or not. Anything
/// that is not a JSON array yields an empty vector.
pub fn parse_translation_response(content: &str) -> Vec<String> {
    let stripped = strip_code_fences(content.trim());

    match serde_json::from_str::<Value>(stripped.trim()) {
        Ok(Value::Array(items)) => items.into_iter().map(item_to_string).collect(),
        _ => Vec::new(),
    }
}

fn strip_code_fences(content: &str) -> String {
    if content.contains(JSON_FENCE) {
        let without_open = remove_marker_and_whitespace(content, JSON_FENCE);
        let trimmed = without_open.trim_end();
        return trimmed
            .strip_suffix(FENCE)
            .unwrap_or(trimmed)
            .to_string();
    }

    if content.contains(FENCE) {
        return remove_marker_and_whitespace(content, FENCE);
    }

    content.to_string()
}

fn remove_marker_and_whitespace(content: &str, marker: &str) -> String {
    let mut output = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(index) = rest.find(marker) {
        output.push_str(&rest[..index]);
        rest = rest[index + marker.len()..].trim_start();
    }
    output.push_str(rest);
    output
}

// Non-string items keep their slot so the count check stays meaningful.
fn item_to_string(item: Value) -> String {
    match item {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
