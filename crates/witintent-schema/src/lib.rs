//! Wire types for the wit.ai `/message` endpoint.
//!
//! Only the fields the client consumes are modelled. Unknown fields are
//! ignored. Absent or `null` fields decode as their empty value, so a
//! response with no recognised intents is not an error.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One scored intent as returned by the service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IntentScore {
    /// Intent label.
    #[serde(rename = "value", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confidence: f64,
}

impl IntentScore {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }

    /// True when this score meets the given threshold (inclusive).
    pub fn passes(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Entities {
    #[serde(default, deserialize_with = "null_as_default")]
    pub intent: Vec<IntentScore>,
}

/// Decoded body of a successful classification call.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg_id: String,
    /// Query text as echoed back by the service.
    #[serde(rename = "_text", default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entities: Entities,
}

impl ClassificationResult {
    /// Decode a response body.
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body)
    }

    pub fn intents(&self) -> &[IntentScore] {
        &self.entities.intent
    }

    /// Drop intents scoring below `threshold`, keeping response order.
    pub fn retain_above(&mut self, threshold: f64) {
        self.entities.intent.retain(|i| i.passes(threshold));
    }

    /// Names of intents scoring at or above `threshold`, in response order.
    pub fn intent_names(&self, threshold: f64) -> Vec<String> {
        filter_intents(self.intents(), threshold)
    }
}

/// Project `intents` to the names of those with `confidence >= threshold`.
pub fn filter_intents(intents: &[IntentScore], threshold: f64) -> Vec<String> {
    intents
        .iter()
        .filter(|i| i.passes(threshold))
        .map(|i| i.name.clone())
        .collect()
}
