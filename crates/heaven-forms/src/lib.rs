//! Pet Heaven Forms
//!
//! Declarative form schemas and the submission pipeline behind the adoption
//! application, pet-release request and membership registration.
//!
//! ## Features
//! - Schema-driven required-field and email validation
//! - Field visibility predicates for conditional sub-fields
//! - Flattened string payloads with fixed sentinel values
//! - Pluggable notifier (EmailJS REST client, dry-run logger)
//! - `Editing → Submitting → Submitted` state machine; notifier failures
//!   are reported, never fatal

pub mod error;
pub mod forms;
pub mod identity;
pub mod notifier;
pub mod payload;
pub mod pipeline;
pub mod schema;
pub mod validate;
pub mod values;

pub use error::{FormError, Result};
pub use identity::Identity;
pub use notifier::{
    Delivery, EmailJsNotifier, EmailMessage, LogNotifier, NotificationOutcome, Notifier,
    NotifierError, NotifySettings,
};
pub use payload::Payload;
pub use pipeline::{FormPipeline, FormState, PetForm, Receipt, Redirect, SubmitResult};
pub use schema::{FieldKind, FieldSpec, FormKind, FormSchema, SelectOption, Visibility};
pub use validate::{validate, ErrorMap};
pub use values::{FieldValue, FormValues};
