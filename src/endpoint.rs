use crate::error::Result;
use serde_json::{Map, Value};
use std::fmt;

/// Free-text field that never takes part in endpoint identity.
pub const IGNORED_FIELD: &str = "description";

/// A single allow-rule record. No schema is enforced beyond being a JSON object.
pub type Endpoint = Map<String, Value>;

/// Identity of an endpoint: its normalized form serialized with sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey(String);

impl EndpointKey {
    pub fn of(endpoint: &Endpoint) -> Result<Self> {
        let key = serde_json::to_string(&normalize(endpoint))?;
        Ok(EndpointKey(key))
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the endpoint without its top-level `description`, with object keys
/// sorted at every level.
pub fn normalize(endpoint: &Endpoint) -> Value {
    let mut fields: Vec<(&String, &Value)> = endpoint
        .iter()
        .filter(|(name, _)| name.as_str() != IGNORED_FIELD)
        .collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    Value::Object(
        fields
            .into_iter()
            .map(|(name, value)| (name.clone(), canonicalize(value)))
            .collect(),
    )
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut fields: Vec<(&String, &Value)> = map.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| (name.clone(), canonicalize(value)))
                    .collect(),
            )
        }
        // Element order inside arrays is part of the identity
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
