//! Field validation

use crate::schema::{FieldKind, FormSchema};
use crate::values::FormValues;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

pub const EMAIL_INVALID: &str = "Email is invalid";

/// Field key → message. A field is invalid iff it has an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ErrorMap(BTreeMap<String, String>);

impl ErrorMap {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, message)| (key.as_str(), message.as_str()))
    }

    /// Drop the error for one field; returns whether there was one
    pub fn clear_field(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    /// First invalid field in document order
    pub fn first_in(&self, schema: &FormSchema) -> Option<&'static str> {
        schema
            .fields
            .iter()
            .map(|field| field.key)
            .find(|key| self.contains(key))
    }

    fn insert(&mut self, key: &str, message: &str) {
        self.0.insert(key.to_string(), message.to_string());
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email pattern"))
}

/// Loose `local@domain.tld` shape check
pub fn is_email(value: &str) -> bool {
    email_pattern().is_match(value)
}

/// Check `values` against `schema`. Hidden fields are skipped; there are no
/// cross-field rules.
pub fn validate(schema: &FormSchema, values: &FormValues) -> ErrorMap {
    let mut errors = ErrorMap::default();

    for field in schema.fields.iter().filter(|field| field.is_visible(values)) {
        if field.kind.is_checkbox() {
            if let Some(message) = field.required {
                if !values.flag(field.key) {
                    errors.insert(field.key, message);
                }
            }
            continue;
        }

        let text = values.text(field.key);
        if text.trim().is_empty() {
            if let Some(message) = field.required {
                errors.insert(field.key, message);
            }
        } else if field.kind == FieldKind::Email && !is_email(text) {
            errors.insert(field.key, EMAIL_INVALID);
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FormKind};
    use crate::values::FieldValue;

    fn schema() -> FormSchema {
        FormSchema {
            kind: FormKind::Membership,
            title: "Test",
            fields: vec![
                FieldSpec::text("name", "Name").required("Name is required"),
                FieldSpec::email("email", "Email").required("Email is required"),
                FieldSpec::email("backupEmail", "Backup email"),
                FieldSpec::select("pets", "Pets?", &[("yes", "Yes"), ("no", "No")]).required("Please select"),
                FieldSpec::text("petNames", "Names").visible_when("pets", "yes"),
                FieldSpec::checkbox("terms", "Accept").required("Please accept"),
            ],
        }
    }

    fn values(pairs: &[(&str, FieldValue)]) -> FormValues {
        let mut values = FormValues::seeded(&schema());
        for (key, value) in pairs {
            values.insert(key, value.clone());
        }
        values
    }

    #[test]
    fn test_all_empty_reports_exactly_required_fields() {
        let schema = schema();
        let errors = validate(&schema, &FormValues::seeded(&schema));
        let keys: Vec<&str> = errors.keys().collect();
        let mut required: Vec<&str> = schema.required_keys().collect();
        required.sort();
        assert_eq!(keys, required);
        assert_eq!(errors.first_in(&schema), Some("name"));
    }

    #[test]
    fn test_whitespace_counts_as_empty() {
        let errors = validate(&schema(), &values(&[("name", "   ".into())]));
        assert_eq!(errors.get("name"), Some("Name is required"));
    }

    #[test]
    fn test_email_shape() {
        assert!(!is_email("a@b"));
        assert!(is_email("a@b.com"));
        assert!(!is_email("a b@c"));
        assert!(!is_email("@b.com"));

        let errors = validate(&schema(), &values(&[("email", "a@b".into())]));
        assert_eq!(errors.get("email"), Some(EMAIL_INVALID));

        let errors = validate(&schema(), &values(&[("email", "a@b.com".into())]));
        assert!(!errors.contains("email"));
    }

    #[test]
    fn test_optional_email_checked_only_when_filled() {
        let errors = validate(&schema(), &values(&[]));
        assert!(!errors.contains("backupEmail"));

        let errors = validate(&schema(), &values(&[("backupEmail", "nope".into())]));
        assert_eq!(errors.get("backupEmail"), Some(EMAIL_INVALID));
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        let errors = validate(
            &schema(),
            &values(&[
                ("name", "Ada".into()),
                ("email", "ada@example.com".into()),
                ("pets", "no".into()),
                ("terms", true.into()),
            ]),
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_first_in_follows_document_order() {
        let errors = validate(&schema(), &values(&[("name", "Ada".into())]));
        assert_eq!(errors.first_in(&schema()), Some("email"));
    }

    #[test]
    fn test_clear_field() {
        let mut errors = validate(&schema(), &values(&[]));
        let before = errors.len();
        assert!(errors.clear_field("email"));
        assert!(!errors.clear_field("email"));
        assert_eq!(errors.len(), before - 1);
        assert!(errors.contains("name"));
    }
}
