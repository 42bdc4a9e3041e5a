//! Response envelope validation
//!
//! Every API response wraps its payload in an envelope:
//!
//! ```json
//! { "object": "user", "url": "https://api.wanikani.com/v2/user",
//!   "data_updated_at": "2024-10-01T10:00:00.000000Z", "data": { ... } }
//! ```
//!
//! Collections add `pages` and `total_count`, which are ignored here. The
//! envelope is checked once, at the deserialization boundary, and only
//! `data` travels further.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

/// Wire-level wrapper around a resource or collection payload
#[derive(Debug, Deserialize)]
pub struct Envelope {
    /// Object kind, e.g. `"user"`, `"collection"`, `"report"`
    pub object: String,
    /// Canonical URL of the resource
    pub url: String,
    /// When the data last changed on the server
    #[serde(default)]
    pub data_updated_at: Option<String>,
    /// The payload
    pub data: Value,
    /// Extra collection data (e.g. included subjects)
    #[serde(default)]
    pub additional_data: Option<Value>,
}

impl Envelope {
    /// Validates a parsed response body as an envelope
    ///
    /// Fails with `ApiError::InvalidEnvelope` naming the first field with the
    /// wrong shape.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        let object = value
            .as_object()
            .ok_or_else(|| ApiError::InvalidEnvelope("response is not a JSON object".to_string()))?;

        for field in ["object", "url"] {
            match object.get(field) {
                Some(Value::String(_)) => {}
                Some(_) => return Err(invalid(format!("`{}` is not a string", field))),
                None => return Err(invalid(format!("missing `{}`", field))),
            }
        }
        if !object.contains_key("data") {
            return Err(invalid("missing `data`".to_string()));
        }
        match object.get("data_updated_at") {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => return Err(invalid("`data_updated_at` is not a string".to_string())),
        }

        serde_json::from_value(value).map_err(|e| invalid(e.to_string()))
    }

    /// Extracts the payload, discarding the rest of the envelope
    pub fn into_data(self) -> Value {
        self.data
    }
}

fn invalid(reason: String) -> ApiError {
    ApiError::InvalidEnvelope(reason)
}
