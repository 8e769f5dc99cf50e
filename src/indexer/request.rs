//! Wire types for the indexing endpoint
//!
//! Request bodies are either `{"url": "..."}` or the older bulk shape
//! `{"urls": ["..."]}`. Response bodies are decoded once into
//! [`IndexResponse`]; nothing downstream looks at raw JSON.

use crate::config::RequestFormat;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Document URLs to be indexed in one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexingRequest {
    urls: Vec<String>,
}

impl IndexingRequest {
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
        }
    }

    /// Serializes the request body in the given format
    ///
    /// The single format only carries the first URL.
    pub fn to_body(&self, format: RequestFormat) -> Value {
        match format {
            RequestFormat::Single => serde_json::json!({
                "url": self.urls.first().map(String::as_str).unwrap_or_default(),
            }),
            RequestFormat::Batch => serde_json::json!({ "urls": &self.urls }),
        }
    }
}

/// Raw `errors` member as sent by the various service versions
#[derive(Deserialize)]
#[serde(untagged)]
enum RawErrors {
    ByKey(BTreeMap<String, Value>),
    Messages(Vec<Value>),
    Message(String),
}

/// Decoded indexing response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexResponse {
    /// Error message per key; keys are document URLs or study ids depending
    /// on the service version
    pub errors: BTreeMap<String, String>,

    /// Study ids the service reports as indexed, when it reports them
    pub indexed: Vec<String>,
}

impl IndexResponse {
    /// Decodes a 2xx response body
    ///
    /// Bodies that are empty, not JSON, or not an object (the single-study
    /// endpoint answers `true`) carry no errors. `errors` and `indexed` are
    /// decoded independently, so a malformed `indexed` never hides an error.
    /// Bare messages, as a string or an array, are keyed by `submitted_url`.
    pub fn from_body(body: &str, submitted_url: &str) -> Self {
        let Ok(Value::Object(mut fields)) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };

        let errors = match fields.remove("errors") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => BTreeMap::new(),
            Some(raw) => decode_errors(raw, submitted_url),
        };

        let indexed = match fields.remove("indexed") {
            Some(Value::Array(items)) => items.into_iter().map(message_text).collect(),
            _ => Vec::new(),
        };

        Self { errors, indexed }
    }

    /// Error message that applies to a request carrying only `url`
    ///
    /// A single-URL request owns every entry in the error map, whatever the
    /// key. The entry keyed by `url` itself is preferred; otherwise all
    /// entries are reported with their keys.
    pub fn error_for(&self, url: &str) -> Option<String> {
        if let Some(message) = self.errors.get(url) {
            return Some(message.clone());
        }
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|(key, message)| format!("{}: {}", key, message))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// True when the service reported no error for a request carrying `url`
    pub fn succeeded(&self, url: &str) -> bool {
        self.error_for(url).is_none()
    }
}

fn decode_errors(raw: Value, submitted_url: &str) -> BTreeMap<String, String> {
    let attributed = |message: String| BTreeMap::from([(submitted_url.to_string(), message)]);

    match RawErrors::deserialize(raw.clone()) {
        Ok(RawErrors::ByKey(map)) => map
            .into_iter()
            .map(|(key, message)| (key, message_text(message)))
            .collect(),
        Ok(RawErrors::Messages(messages)) if messages.is_empty() => BTreeMap::new(),
        Ok(RawErrors::Messages(messages)) => attributed(
            messages
                .into_iter()
                .map(message_text)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Ok(RawErrors::Message(message)) if message.is_empty() => BTreeMap::new(),
        Ok(RawErrors::Message(message)) => attributed(message),
        // Numbers or `true`: still an error, just not a described one
        Err(_) => attributed(message_text(raw)),
    }
}

fn message_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => "(no message)".to_string(),
        other => other.to_string(),
    }
}
