//! Field values

use crate::schema::{FieldKind, FormSchema};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text for inputs/selects, a flag for checkboxes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

/// Current value of every field in a schema.
///
/// Built with [`FormValues::seeded`], so every schema key always has an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormValues(BTreeMap<String, FieldValue>);

impl FormValues {
    /// Empty text for inputs and selects, `false` for checkboxes
    pub fn seeded(schema: &FormSchema) -> Self {
        let values = schema
            .fields
            .iter()
            .map(|field| {
                let value = match field.kind {
                    FieldKind::Checkbox => FieldValue::Flag(false),
                    _ => FieldValue::Text(String::new()),
                };
                (field.key.to_string(), value)
            })
            .collect();
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Text value, or "" for missing keys and checkboxes
    pub fn text(&self, key: &str) -> &str {
        self.get(key).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Checkbox value, or `false` for missing keys and text fields
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(FieldValue::as_flag).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub(crate) fn insert(&mut self, key: &str, value: FieldValue) {
        self.0.insert(key.to_string(), value);
    }
}
