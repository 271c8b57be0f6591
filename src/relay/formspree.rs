use async_trait::async_trait;
use serde_json::Value;

use super::{Notification, NotificationRelay, RelayError, RelayReceipt};

/// Posts the flattened submission to a Formspree form endpoint.
///
/// Formspree only sees key/value pairs, so attachments must reach it as a link.
pub struct FormspreeRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl FormspreeRelay {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl NotificationRelay for FormspreeRelay {
    fn name(&self) -> &'static str {
        "formspree"
    }

    async fn send(
        &self,
        notification: &Notification,
        _recipient: &str,
        subject_template: &str,
    ) -> Result<RelayReceipt, RelayError> {
        if !notification.attachments().is_empty() {
            return Err(RelayError::AttachmentsUnsupported("formspree"));
        }

        let mut body = notification.flattened();
        body.insert(
            "_subject".to_string(),
            Value::String(notification.subject(subject_template)),
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(1024)
                .collect::<String>();
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(RelayReceipt::default())
    }
}
