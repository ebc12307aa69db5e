//! Outbound email notification
//!
//! Submissions are relayed to the shelter operator through a transactional
//! email service. The pipeline only depends on the [`Notifier`] trait.

use crate::payload::Payload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// One templated email
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub service_id: String,
    pub template_id: String,
    pub access_key: String,
    pub params: Payload,
}

/// Opaque success report from the relay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub status: u16,
    pub text: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifierError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<Delivery, NotifierError>;
}

/// What happened to the notification for a submission. Recorded on the
/// receipt; a failure never undoes the submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum NotificationOutcome {
    Delivered { code: u16, text: String },
    Failed { reason: String },
    /// The form has no email template
    Skipped,
}

impl NotificationOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl From<Result<Delivery, NotifierError>> for NotificationOutcome {
    fn from(result: Result<Delivery, NotifierError>) -> Self {
        match result {
            Ok(delivery) => Self::Delivered {
                code: delivery.status,
                text: delivery.text,
            },
            Err(e) => Self::Failed { reason: e.to_string() },
        }
    }
}

/// Relay account, templates and addresses
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    pub service_id: String,
    pub public_key: String,
    pub adoption_template: String,
    pub release_template: String,
    /// Recipient of every submission (`to_email`)
    pub operator_email: String,
    /// Address offered to the visitor when delivery fails
    pub fallback_contact: String,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            public_key: String::new(),
            adoption_template: "adoption".into(),
            release_template: "release".into(),
            operator_email: "adoptions@petheaven.org".into(),
            fallback_contact: "adoptions@petheaven.org".into(),
        }
    }
}

impl NotifySettings {
    pub fn message(&self, template_id: &str, params: Payload) -> EmailMessage {
        EmailMessage {
            service_id: self.service_id.clone(),
            template_id: template_id.to_string(),
            access_key: self.public_key.clone(),
            params,
        }
    }

    /// Credentials needed to talk to the relay are present
    pub fn is_configured(&self) -> bool {
        !self.service_id.is_empty() && !self.public_key.is_empty()
    }

    pub fn failure_warning(&self) -> String {
        format!(
            "Form submitted, but email notification failed. Please contact us directly at {}",
            self.fallback_contact
        )
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
    template_params: &'a Payload,
}

/// EmailJS REST client
pub struct EmailJsNotifier {
    client: reqwest::Client,
    send_url: Url,
    private_key: Option<String>,
}

impl EmailJsNotifier {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.emailjs.com";
    const SEND_PATH: &'static str = "api/v1.0/email/send";
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(endpoint: &str, private_key: Option<String>) -> Result<Self, NotifierError> {
        let base = Url::parse(endpoint).map_err(|e| NotifierError::InvalidEndpoint(format!("{endpoint}: {e}")))?;
        let send_url = base
            .join(Self::SEND_PATH)
            .map_err(|e| NotifierError::InvalidEndpoint(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| NotifierError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            send_url,
            private_key,
        })
    }

    pub fn send_url(&self) -> &Url {
        &self.send_url
    }
}

#[async_trait]
impl Notifier for EmailJsNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<Delivery, NotifierError> {
        let body = SendRequest {
            service_id: &message.service_id,
            template_id: &message.template_id,
            user_id: &message.access_key,
            access_token: self.private_key.as_deref(),
            template_params: &message.params,
        };

        debug!("Sending template {} via {}", message.template_id, self.send_url);
        let resp = self
            .client
            .post(self.send_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifierError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if status.is_success() {
            Ok(Delivery {
                status: status.as_u16(),
                text,
            })
        } else {
            Err(NotifierError::Rejected {
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

/// Dry-run notifier: logs the message and reports success
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<Delivery, NotifierError> {
        info!(
            template = %message.template_id,
            fields = message.params.len(),
            "Dry run, email not sent: {:?}",
            message.params
        );
        Ok(Delivery {
            status: 200,
            text: "OK (dry run)".into(),
        })
    }
}
