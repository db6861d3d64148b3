//! Plain-text extraction from heterogeneous response payloads.

use serde_json::Value;

/// Keys searched, in order, when message content is itself an object.
const NESTED_TEXT_KEYS: [&str; 3] = ["text", "output_text", "content"];

/// Extracts human-readable text from a response payload.
///
/// Strings pass through unchanged. Objects are searched for the
/// chat-completions shapes `choices[0].message.content` and
/// `choices[0].text`, falling back to their JSON serialization. Anything else
/// is converted with its display form. Never fails.
pub fn extract_text(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            let first_choice = map
                .get("choices")
                .and_then(Value::as_array)
                .and_then(|choices| choices.first());
            if let Some(choice) = first_choice {
                if let Some(text) = from_message(choice) {
                    return text;
                }
                if let Some(text) = choice.get("text").and_then(Value::as_str) {
                    return text.to_string();
                }
            }
            payload.to_string()
        }
        other => other.to_string(),
    }
}

/// `message.content` of one choice: a string, a nested text field, or the
/// nested object serialized.
fn from_message(choice: &Value) -> Option<String> {
    let content = choice.get("message")?.as_object()?.get("content")?;
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Object(nested) => Some(
            NESTED_TEXT_KEYS
                .iter()
                .find_map(|key| nested.get(*key).and_then(Value::as_str))
                .map(String::from)
                .unwrap_or_else(|| content.to_string()),
        ),
        _ => None,
    }
}
