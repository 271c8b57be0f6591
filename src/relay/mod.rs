pub mod body;
pub mod formspree;
pub mod resend;
pub mod smtp;
pub mod template;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::models::{Attachment, FormKind, Submission};

pub use formspree::FormspreeRelay;
pub use resend::ResendRelay;
pub use smtp::SmtpRelay;

pub const NO_ATTACHMENT: &str = "No file attached";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelayReceipt {
    pub id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("Failed to render message: {0}")]
    Render(String),
    #[error("Invalid address: {0}")]
    Address(String),
    #[error("Relay request failed: {0}")]
    Transport(String),
    #[error("Relay rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("{0} relay cannot carry attachments")]
    AttachmentsUnsupported(&'static str),
}

/// Outbound provider that delivers a submission to a person.
#[async_trait]
pub trait NotificationRelay: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(
        &self,
        notification: &Notification,
        recipient: &str,
        subject_template: &str,
    ) -> Result<RelayReceipt, RelayError>;
}

/// Flattened view of a submission handed to a relay.
#[derive(Debug, Clone)]
pub struct Notification {
    kind: FormKind,
    fields: Vec<(&'static str, String)>,
    link: Option<String>,
    attachments: Vec<Attachment>,
}

impl Notification {
    /// `link` is the remote copy of the attachment, if one was uploaded.
    /// When `inline` is set the attachment bytes travel with the message.
    pub fn new(submission: &Submission, link: Option<String>, inline: bool) -> Self {
        let mut attachments = Vec::new();

        let fields = match submission {
            Submission::ClientInquiry(inquiry) => vec![
                ("companyName", inquiry.company_name.clone()),
                ("contactPerson", inquiry.contact_person.clone()),
                ("clientEmail", inquiry.client_email.clone()),
                ("clientPhone", inquiry.client_phone.clone().unwrap_or_default()),
                ("projectDescription", inquiry.project_description.clone()),
            ],
            Submission::JobApplication(app) => {
                let mut fields = vec![
                    ("name", app.name.clone()),
                    ("howHeavy", app.how_heavy.clone()),
                ];
                if let Some(cv) = &app.cv_file {
                    fields.push(("cvFile", cv.file_name.clone()));
                    if inline {
                        attachments.push(cv.clone());
                    }
                }
                fields
            }
        };

        Self {
            kind: submission.kind(),
            fields,
            link,
            attachments,
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn subject(&self, template: &str) -> String {
        template::render(template, self)
    }

    pub fn html(&self) -> Result<String, RelayError> {
        body::render(self)
    }

    /// Key/value form with `driveLink` always present.
    pub fn flattened(&self) -> Map<String, Value> {
        let mut map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
            .collect();
        map.insert(
            "driveLink".to_string(),
            Value::String(self.link.clone().unwrap_or_else(|| NO_ATTACHMENT.to_string())),
        );
        map
    }
}
