//! Lookup request body.

use serde_json::Value;

/// Body of `POST /api/lookup`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRequest {
    /// Raw domain as typed by the user; empty when missing or not a string.
    pub domain: String,
}

impl LookupRequest {
    /// Lenient parse: anything that is not a JSON object with a string
    /// `domain` yields an empty domain, which the handler then rejects.
    pub fn from_body(body: &[u8]) -> Self {
        let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
            return Self::default();
        };
        let domain = match fields.get("domain") {
            Some(Value::String(domain)) => domain.clone(),
            _ => String::new(),
        };
        Self { domain }
    }
}
