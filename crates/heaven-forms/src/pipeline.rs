//! Form submission pipeline
//!
//! Editing → Submitting → Submitted
//!
//! A failed validation keeps the form in `Editing`. Once validation passes
//! the notifier is called exactly once and the form always ends in
//! `Submitted`, whether or not the email went out.

use crate::error::{FormError, Result};
use crate::forms::{adoption, membership, release};
use crate::identity::Identity;
use crate::notifier::{EmailMessage, NotificationOutcome, Notifier, NotifySettings};
use crate::schema::{FieldSpec, FormKind, FormSchema};
use crate::validate::{validate, ErrorMap};
use crate::values::{FieldValue, FormValues};
use chrono::{DateTime, Utc};
use heaven_catalog::{Catalog, Pet, PetLookup};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    Editing,
    Submitting,
    Submitted,
}

/// Where the visitor is sent after the confirmation view, and when
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub to: &'static str,
    pub after_ms: u64,
}

impl Redirect {
    pub fn after(&self) -> Duration {
        Duration::from_millis(self.after_ms)
    }
}

/// Proof of a completed submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    pub form: FormKind,
    pub outcome: NotificationOutcome,
    /// Set only when the notifier failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub redirect: Redirect,
    /// The new member, for membership registrations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitResult {
    /// Validation failed; `focus` is the first invalid field in document order
    Invalid { errors: ErrorMap, focus: &'static str },
    Submitted(Receipt),
}

/// A pet-bound form, or the terminal not-found state when the requested pet
/// is not in the catalog. `NotFound` offers no operations.
#[derive(Debug)]
pub enum PetForm {
    Ready(FormPipeline),
    NotFound { requested: String },
}

impl PetForm {
    pub fn ready(self) -> Option<FormPipeline> {
        match self {
            Self::Ready(pipeline) => Some(pipeline),
            Self::NotFound { .. } => None,
        }
    }
}

/// One form instance: its values, errors and submission state
#[derive(Debug)]
pub struct FormPipeline {
    kind: FormKind,
    schema: &'static FormSchema,
    pet: Option<Pet>,
    settings: NotifySettings,
    values: FormValues,
    errors: ErrorMap,
    state: FormState,
    receipt: Option<Receipt>,
}

impl FormPipeline {
    fn open(kind: FormKind, pet: Option<Pet>, settings: NotifySettings) -> Self {
        let schema = kind.schema();
        Self {
            kind,
            schema,
            pet,
            settings,
            values: FormValues::seeded(schema),
            errors: ErrorMap::default(),
            state: FormState::Editing,
            receipt: None,
        }
    }

    /// Adoption application for pet `raw_id`. The applicant's name and email
    /// are pre-filled from `identity` when given.
    pub fn adoption(
        catalog: &Catalog,
        raw_id: &str,
        settings: NotifySettings,
        identity: Option<&Identity>,
    ) -> PetForm {
        let pet = match catalog.lookup(raw_id) {
            PetLookup::Found(pet) => pet.clone(),
            PetLookup::NotFound { requested } => {
                debug!("Adoption form requested for unknown pet {requested:?}");
                return PetForm::NotFound { requested };
            }
        };

        let mut pipeline = Self::open(FormKind::Adoption, Some(pet), settings);
        if let Some(identity) = identity {
            if let Some(name) = &identity.name {
                pipeline.values.insert("fullName", FieldValue::Text(name.clone()));
            }
            if let Some(email) = &identity.email {
                pipeline.values.insert("email", FieldValue::Text(email.clone()));
            }
        }
        PetForm::Ready(pipeline)
    }

    pub fn release(settings: NotifySettings) -> Self {
        Self::open(FormKind::Release, None, settings)
    }

    pub fn membership(settings: NotifySettings) -> Self {
        Self::open(FormKind::Membership, None, settings)
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn pet(&self) -> Option<&Pet> {
        self.pet.as_ref()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    /// Fields whose visibility predicate holds for the current values
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.schema
            .fields
            .iter()
            .filter(|field| field.is_visible(&self.values))
    }

    /// Store a value and clear that field's error. Other errors are kept and
    /// nothing is re-validated.
    pub fn set_field(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<()> {
        self.ensure_editing()?;
        let field = self
            .schema
            .field(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;

        let value = value.into();
        match (field.kind.is_checkbox(), &value) {
            (true, FieldValue::Flag(_)) | (false, FieldValue::Text(_)) => {}
            (true, FieldValue::Text(_)) => {
                return Err(FormError::TypeMismatch { field: key.to_string(), expected: "boolean" })
            }
            (false, FieldValue::Flag(_)) => {
                return Err(FormError::TypeMismatch { field: key.to_string(), expected: "text" })
            }
        }

        self.values.insert(key, value);
        self.errors.clear_field(key);
        Ok(())
    }

    /// Check the current values without touching the stored errors
    pub fn validate(&self) -> ErrorMap {
        validate(self.schema, &self.values)
    }

    /// Validate, then notify and finish. Validation errors are returned as
    /// data and also kept on the pipeline for display.
    pub async fn submit(&mut self, notifier: &dyn Notifier) -> Result<SubmitResult> {
        self.ensure_editing()?;

        let errors = self.validate();
        if let Some(focus) = errors.first_in(self.schema) {
            debug!(form = %self.kind, invalid = errors.len(), "Submission rejected");
            self.errors = errors.clone();
            return Ok(SubmitResult::Invalid { errors, focus });
        }

        self.errors = ErrorMap::default();
        self.state = FormState::Submitting;

        let outcome = match self.message() {
            Some(message) => {
                let outcome = NotificationOutcome::from(notifier.send(&message).await);
                if let NotificationOutcome::Failed { reason } = &outcome {
                    warn!(form = %self.kind, "Notification failed, submission kept: {reason}");
                }
                outcome
            }
            None => NotificationOutcome::Skipped,
        };

        let warning = outcome.is_failed().then(|| self.settings.failure_warning());
        let identity = (self.kind == FormKind::Membership).then(|| membership::identity(&self.values));
        let receipt = Receipt {
            id: Uuid::new_v4(),
            form: self.kind,
            outcome,
            warning,
            redirect: self.redirect(),
            identity,
            submitted_at: Utc::now(),
        };

        self.state = FormState::Submitted;
        self.receipt = Some(receipt.clone());
        info!(form = %self.kind, receipt = %receipt.id, "Form submitted");
        Ok(SubmitResult::Submitted(receipt))
    }

    fn ensure_editing(&self) -> Result<()> {
        match self.state {
            FormState::Editing => Ok(()),
            FormState::Submitting => Err(FormError::SubmissionInFlight),
            FormState::Submitted => Err(FormError::AlreadySubmitted),
        }
    }

    fn redirect(&self) -> Redirect {
        match self.kind {
            FormKind::Adoption => adoption::REDIRECT,
            FormKind::Release => release::REDIRECT,
            FormKind::Membership => membership::REDIRECT,
        }
    }

    fn message(&self) -> Option<EmailMessage> {
        let operator = &self.settings.operator_email;
        match (self.kind, &self.pet) {
            (FormKind::Adoption, Some(pet)) => {
                let params = adoption::payload(pet, &self.values, operator);
                Some(self.settings.message(&self.settings.adoption_template, params))
            }
            (FormKind::Release, _) => {
                let params = release::payload(&self.values, operator);
                Some(self.settings.message(&self.settings.release_template, params))
            }
            (FormKind::Adoption, None) | (FormKind::Membership, _) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifier::{Delivery, NotifierError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeNotifier {
        fail: bool,
        sent: Mutex<Vec<EmailMessage>>,
    }

    impl FakeNotifier {
        fn ok() -> Self {
            Self { fail: false, sent: Mutex::default() }
        }

        fn failing() -> Self {
            Self { fail: true, sent: Mutex::default() }
        }

        fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }

        fn first(&self) -> EmailMessage {
            self.sent.lock().unwrap()[0].clone()
        }
    }

    #[async_trait]
    impl Notifier for FakeNotifier {
        async fn send(&self, message: &EmailMessage) -> std::result::Result<Delivery, NotifierError> {
            self.sent.lock().unwrap().push(message.clone());
            if self.fail {
                Err(NotifierError::Transport("connection refused".into()))
            } else {
                Ok(Delivery { status: 200, text: "OK".into() })
            }
        }
    }

    fn settings() -> NotifySettings {
        NotifySettings {
            service_id: "svc".into(),
            public_key: "key".into(),
            fallback_contact: "help@petheaven.org".into(),
            ..NotifySettings::default()
        }
    }

    fn fill_release(pipeline: &mut FormPipeline) {
        for (key, value) in [
            ("ownerName", "Sam"),
            ("email", "sam@example.com"),
            ("phone", "555-0101"),
            ("petName", "Pickles"),
            ("petType", "cat"),
            ("breed", "Tabby"),
            ("age", "4"),
            ("gender", "female"),
            ("reason", "Moving abroad"),
        ] {
            pipeline.set_field(key, value).unwrap();
        }
    }

    #[tokio::test]
    async fn test_empty_submit_reports_every_required_field() {
        for mut pipeline in [FormPipeline::release(settings()), FormPipeline::membership(settings())] {
            let notifier = FakeNotifier::ok();
            let result = pipeline.submit(&notifier).await.unwrap();

            let SubmitResult::Invalid { errors, focus } = result else {
                panic!("expected validation failure");
            };
            let mut required: Vec<&str> = pipeline.schema().required_keys().collect();
            required.sort();
            assert_eq!(errors.keys().collect::<Vec<_>>(), required);
            assert_eq!(Some(focus), pipeline.schema().required_keys().next());
            assert_eq!(pipeline.state(), FormState::Editing);
            assert_eq!(pipeline.errors(), &errors);
            assert_eq!(notifier.count(), 0);
        }
    }

    #[tokio::test]
    async fn test_editing_clears_only_that_error() {
        let mut pipeline = FormPipeline::release(settings());
        pipeline.submit(&FakeNotifier::ok()).await.unwrap();
        let before = pipeline.errors().len();

        pipeline.set_field("petName", "Pickles").unwrap();
        assert!(!pipeline.errors().contains("petName"));
        assert_eq!(pipeline.errors().len(), before - 1);
        assert!(pipeline.errors().contains("ownerName"));

        // Clearing happens even when the new value is still invalid
        pipeline.set_field("email", "not-an-email").unwrap();
        assert!(!pipeline.errors().contains("email"));
    }

    #[tokio::test]
    async fn test_successful_release_notifies_once() {
        let mut pipeline = FormPipeline::release(settings());
        fill_release(&mut pipeline);
        pipeline.set_field("goodWithDogs", true).unwrap();

        let notifier = FakeNotifier::ok();
        let SubmitResult::Submitted(receipt) = pipeline.submit(&notifier).await.unwrap() else {
            panic!("expected submission");
        };

        assert_eq!(pipeline.state(), FormState::Submitted);
        assert_eq!(receipt.outcome, NotificationOutcome::Delivered { code: 200, text: "OK".into() });
        assert_eq!(receipt.warning, None);
        assert_eq!(receipt.redirect, release::REDIRECT);
        assert_eq!(notifier.count(), 1);

        let sent = notifier.first();
        assert_eq!(sent.template_id, "release");
        assert_eq!(sent.service_id, "svc");
        assert_eq!(sent.access_key, "key");
        assert_eq!(sent.params["good_with_pets"], "Dogs: Yes, Cats: No");
    }

    #[tokio::test]
    async fn test_notifier_failure_still_submits_with_one_warning() {
        let mut pipeline = FormPipeline::release(settings());
        fill_release(&mut pipeline);

        let notifier = FakeNotifier::failing();
        let SubmitResult::Submitted(receipt) = pipeline.submit(&notifier).await.unwrap() else {
            panic!("expected submission");
        };

        assert_eq!(pipeline.state(), FormState::Submitted);
        assert!(receipt.outcome.is_failed());
        let warning = receipt.warning.expect("warning");
        assert!(warning.ends_with("help@petheaven.org"));
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn test_submitted_is_terminal() {
        let mut pipeline = FormPipeline::release(settings());
        fill_release(&mut pipeline);
        let notifier = FakeNotifier::ok();
        pipeline.submit(&notifier).await.unwrap();

        assert_eq!(pipeline.submit(&notifier).await, Err(FormError::AlreadySubmitted));
        assert_eq!(pipeline.set_field("petName", "Other"), Err(FormError::AlreadySubmitted));
        assert_eq!(notifier.count(), 1);
        assert!(pipeline.receipt().is_some());
    }

    #[tokio::test]
    async fn test_adoption_prefills_identity_and_includes_pet() {
        let catalog = Catalog::bundled().unwrap();
        let identity = Identity::new("Ada", "ada@example.com");
        let mut pipeline = FormPipeline::adoption(&catalog, "1", settings(), Some(&identity))
            .ready()
            .expect("pet 1 exists");

        assert_eq!(pipeline.values().text("fullName"), "Ada");
        assert_eq!(pipeline.values().text("email"), "ada@example.com");

        for (key, value) in [
            ("phone", "555-0100"),
            ("address", "1 Analytical Way"),
            ("city", "London"),
            ("housingType", "house"),
            ("hasYard", "no"),
            ("hasOtherPets", "no"),
            ("hasChildren", "no"),
            ("hoursAlone", "2"),
            ("reason", "Fetch partner wanted"),
        ] {
            pipeline.set_field(key, value).unwrap();
        }

        let notifier = FakeNotifier::ok();
        let result = pipeline.submit(&notifier).await.unwrap();
        assert!(matches!(result, SubmitResult::Submitted(ref r) if r.redirect == adoption::REDIRECT));

        let sent = notifier.first();
        assert_eq!(sent.template_id, "adoption");
        assert_eq!(sent.params["pet_name"], "Buddy");
        assert_eq!(sent.params["applicant_name"], "Ada");
    }

    #[test]
    fn test_unknown_pet_is_not_found() {
        let catalog = Catalog::bundled().unwrap();
        let form = FormPipeline::adoption(&catalog, "404", settings(), None);
        assert!(matches!(form, PetForm::NotFound { ref requested } if requested == "404"));
        assert!(form.ready().is_none());
    }

    #[tokio::test]
    async fn test_membership_skips_notifier_and_returns_identity() {
        let mut pipeline = FormPipeline::membership(settings());
        pipeline.set_field("name", "Grace").unwrap();
        pipeline.set_field("email", "grace@example.com").unwrap();
        pipeline.set_field("phone", "555-0199").unwrap();
        pipeline.set_field("interestFostering", true).unwrap();

        let notifier = FakeNotifier::ok();
        let SubmitResult::Submitted(receipt) = pipeline.submit(&notifier).await.unwrap() else {
            panic!("expected submission");
        };
        assert_eq!(receipt.outcome, NotificationOutcome::Skipped);
        assert_eq!(receipt.identity, Some(Identity::new("Grace", "grace@example.com")));
        assert_eq!(receipt.redirect.after(), Duration::from_millis(2500));
        assert_eq!(notifier.count(), 0);
    }

    #[test]
    fn test_set_field_rejects_unknown_keys_and_kind_mismatch() {
        let mut pipeline = FormPipeline::release(settings());
        assert_eq!(
            pipeline.set_field("favouriteColour", "blue"),
            Err(FormError::UnknownField("favouriteColour".into()))
        );
        assert!(matches!(
            pipeline.set_field("goodWithCats", "yes"),
            Err(FormError::TypeMismatch { expected: "boolean", .. })
        ));
        assert!(matches!(
            pipeline.set_field("petName", true),
            Err(FormError::TypeMismatch { expected: "text", .. })
        ));
    }

    #[test]
    fn test_visible_fields_follow_answers() {
        let catalog = Catalog::bundled().unwrap();
        let mut pipeline = FormPipeline::adoption(&catalog, "2", settings(), None).ready().unwrap();
        let visible = |p: &FormPipeline| p.visible_fields().map(|f| f.key).collect::<Vec<_>>();

        assert!(!visible(&pipeline).contains(&"childrenAges"));
        pipeline.set_field("hasChildren", "yes").unwrap();
        assert!(visible(&pipeline).contains(&"childrenAges"));
        assert!(!visible(&pipeline).contains(&"otherPetsDetails"));
    }
}
