//! Shapes the EDMS REST API is known to answer with, and the helpers that
//! normalize them before decoding.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::application::ports::edms_client::EdmsClientError;

/// Peels the response envelope off a payload.
///
/// The EDMS API answers bare, under a named key, under `data`, or as a
/// paginated `{results: [...]}` list depending on the endpoint and version.
pub fn unwrap_envelope(mut body: Value, key: Option<&str>) -> Value {
    if let Value::Object(map) = &mut body {
        if let Some(inner) = key.and_then(|k| map.remove(k)) {
            return inner;
        }
        if let Some(inner) = map.remove("data") {
            return unwrap_envelope(inner, key);
        }
        if matches!(map.get("results"), Some(Value::Array(_))) {
            return map.remove("results").unwrap_or_default();
        }
    }
    body
}

pub fn decode<T: DeserializeOwned>(body: Value, key: Option<&str>) -> Result<T, EdmsClientError> {
    serde_json::from_value(unwrap_envelope(body, key))
        .map_err(|e| EdmsClientError::Decode(e.to_string()))
}

/// Best-effort human message from an error body.
pub fn error_message(status: u16, body: &Value) -> String {
    const KEYS: [&str; 4] = ["detail", "error", "message", "non_field_errors"];
    if let Value::Object(map) = body {
        for key in KEYS {
            if let Some(msg) = map.get(key).and_then(first_text) {
                return msg;
            }
        }
        if let Some((field, msg)) = map
            .iter()
            .find_map(|(field, v)| first_text(v).map(|m| (field, m)))
        {
            return format!("{field}: {msg}");
        }
    }
    if let Some(msg) = first_text(body) {
        return msg;
    }
    format!("request failed with status {status}")
}

fn first_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => items.iter().find_map(first_text),
        _ => None,
    }
}

/// Filename from a `Content-Disposition` header, preferring the RFC 5987
/// `filename*` form.
pub fn disposition_filename(header: &str) -> Option<String> {
    let mut plain = None;
    for part in header.split(';').map(str::trim) {
        let Some((name, value)) = part.split_once('=') else {
            continue;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                let value = value.trim().trim_matches('"');
                let encoded = value.rsplit_once("''").map(|(_, v)| v).unwrap_or(value);
                if let Ok(decoded) = urlencoding::decode(encoded) {
                    if !decoded.trim().is_empty() {
                        return Some(decoded.into_owned());
                    }
                }
            }
            "filename" => {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    plain = Some(value.to_string());
                }
            }
            _ => {}
        }
    }
    plain
}
