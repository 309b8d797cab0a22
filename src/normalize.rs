//! Inbound payload normalization
//!
//! Alerting platforms send either a JSON object or free text, and the
//! declared content type is unreliable, so we probe the bytes
//! themselves. A JSON object is flattened to `key: value` lines; any
//! parse failure silently falls back to treating the payload as text.

use serde_json::Value;

/// Turn raw inbound bytes into trimmed text ready for extraction.
///
/// Never fails: malformed JSON and non-object documents are used
/// verbatim as (lossy) UTF-8 text.
pub fn normalize(body: &[u8]) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        let lines: Vec<String> = map
            .iter()
            .map(|(key, value)| format!("{}: {}", key, render_value(value)))
            .collect();
        return lines.join("\n").trim().to_string();
    }

    String::from_utf8_lossy(body).trim().to_string()
}

/// Strings render bare; everything else as compact JSON so nested
/// structures stay on one line.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
