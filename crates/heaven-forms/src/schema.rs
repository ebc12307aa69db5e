//! Form schemas
//!
//! A schema lists fields in document order. Field order matters: the first
//! invalid field is the one the caller should scroll to.

use crate::error::FormError;
use crate::forms;
use crate::values::FormValues;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// The three forms on the site
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Adoption,
    Release,
    Membership,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [Self::Adoption, Self::Release, Self::Membership];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Adoption => "adoption",
            Self::Release => "release",
            Self::Membership => "membership",
        }
    }

    pub fn schema(&self) -> &'static FormSchema {
        static ADOPTION: OnceLock<FormSchema> = OnceLock::new();
        static RELEASE: OnceLock<FormSchema> = OnceLock::new();
        static MEMBERSHIP: OnceLock<FormSchema> = OnceLock::new();

        match self {
            Self::Adoption => ADOPTION.get_or_init(forms::adoption::schema),
            Self::Release => RELEASE.get_or_init(forms::release::schema),
            Self::Membership => MEMBERSHIP.get_or_init(forms::membership::schema),
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FormError::UnknownForm(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    TextArea,
    Select { options: Vec<SelectOption> },
    Checkbox,
}

impl FieldKind {
    pub fn is_checkbox(&self) -> bool {
        matches!(self, Self::Checkbox)
    }
}

/// Show a field only while another field holds a given value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    pub field: &'static str,
    pub equals: &'static str,
}

impl Visibility {
    pub fn holds(&self, values: &FormValues) -> bool {
        values.text(self.field) == self.equals
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Message shown when the field is left empty; `None` for optional fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Visibility>,
}

impl FieldSpec {
    fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: None,
            visible_when: None,
        }
    }

    pub fn text(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Text)
    }

    pub fn email(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Email)
    }

    pub fn tel(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Tel)
    }

    pub fn textarea(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::TextArea)
    }

    pub fn select(key: &'static str, label: &'static str, options: &[(&'static str, &'static str)]) -> Self {
        let options = options
            .iter()
            .map(|&(value, label)| SelectOption { value, label })
            .collect();
        Self::new(key, label, FieldKind::Select { options })
    }

    pub fn checkbox(key: &'static str, label: &'static str) -> Self {
        Self::new(key, label, FieldKind::Checkbox)
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required = Some(message);
        self
    }

    pub fn visible_when(mut self, field: &'static str, equals: &'static str) -> Self {
        self.visible_when = Some(Visibility { field, equals });
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    pub fn is_visible(&self, values: &FormValues) -> bool {
        self.visible_when.as_ref().map_or(true, |rule| rule.holds(values))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    pub kind: FormKind,
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl FormSchema {
    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Index in document order
    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.key == key)
    }

    pub fn required_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|field| field.is_required())
            .map(|field| field.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schemas_have_unique_keys() {
        for kind in FormKind::ALL {
            let schema = kind.schema();
            assert_eq!(schema.kind, kind);
            let keys: HashSet<_> = schema.fields.iter().map(|f| f.key).collect();
            assert_eq!(keys.len(), schema.fields.len(), "{kind}");
        }
    }

    #[test]
    fn test_visibility_predicates_reference_select_fields() {
        for kind in FormKind::ALL {
            let schema = kind.schema();
            for field in &schema.fields {
                if let Some(rule) = &field.visible_when {
                    let source = schema.field(rule.field).expect("predicate source exists");
                    assert!(matches!(source.kind, FieldKind::Select { .. }));
                    assert!(schema.position(rule.field) < schema.position(field.key));
                }
            }
        }
    }

    #[test]
    fn test_form_kind_parse() {
        assert_eq!("release".parse::<FormKind>().unwrap(), FormKind::Release);
        assert_eq!(
            "volunteer".parse::<FormKind>().unwrap_err(),
            FormError::UnknownForm("volunteer".into())
        );
    }

    #[test]
    fn test_field_spec_serializes_flat() {
        let field = FieldSpec::select("hasYard", "Do you have a yard?", &[("no", "No")])
            .required("Please select an option");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["options"][0]["value"], "no");
        assert_eq!(json["required"], "Please select an option");
        assert!(json.get("visibleWhen").is_none());
    }
}
