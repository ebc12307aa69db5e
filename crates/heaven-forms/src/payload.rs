//! Notification payloads
//!
//! Payloads are flat string maps. Email templates render every value as
//! literal text, so optional answers left blank are replaced with a fixed
//! sentinel instead of being sent empty.

use crate::values::FormValues;
use std::collections::BTreeMap;

pub type Payload = BTreeMap<String, String>;

pub const NOT_PROVIDED: &str = "Not provided";
pub const NOT_APPLICABLE: &str = "N/A";
pub const NOT_SPECIFIED: &str = "Not specified";
pub const NONE: &str = "None";

pub(crate) struct PayloadBuilder<'a> {
    values: &'a FormValues,
    payload: Payload,
}

impl<'a> PayloadBuilder<'a> {
    pub(crate) fn new(values: &'a FormValues, operator_email: &str) -> Self {
        let mut payload = Payload::new();
        payload.insert("to_email".into(), operator_email.to_string());
        Self { values, payload }
    }

    pub(crate) fn literal(mut self, name: &str, value: impl Into<String>) -> Self {
        self.payload.insert(name.to_string(), value.into());
        self
    }

    /// Copy a field as-is
    pub(crate) fn field(self, name: &str, key: &str) -> Self {
        let value = self.values.text(key).trim().to_string();
        self.literal(name, value)
    }

    /// Copy a field, substituting `sentinel` when it is blank
    pub(crate) fn field_or(self, name: &str, key: &str, sentinel: &str) -> Self {
        let value = non_blank(self.values.text(key)).unwrap_or(sentinel).to_string();
        self.literal(name, value)
    }

    pub(crate) fn build(self) -> Payload {
        self.payload
    }
}

pub(crate) fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
