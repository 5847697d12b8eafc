//! Structured context attached to outcome events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Open key/value map describing an outcome.
///
/// Keys are kept sorted so the rendered JSON is stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutcomeContext {
    fields: BTreeMap<String, Value>,
}

impl OutcomeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn with_caller(self, caller: impl Into<String>) -> Self {
        let caller: String = caller.into();
        self.with("caller", caller)
    }

    pub fn with_component(self, component: impl Into<String>) -> Self {
        let component: String = component.into();
        self.with("component", component)
    }

    /// Stamp the context with the current time (RFC 3339, UTC).
    pub fn with_timestamp(self) -> Self {
        self.with_timestamp_at(Utc::now())
    }

    pub fn with_timestamp_at(self, at: DateTime<Utc>) -> Self {
        self.with("timestamp", at.to_rfc3339())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for OutcomeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.fields).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
