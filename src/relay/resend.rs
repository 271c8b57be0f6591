use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{Notification, NotificationRelay, RelayError, RelayReceipt};

/// Sends notifications through the Resend HTTP API.
pub struct ResendRelay {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    from: String,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

impl ResendRelay {
    pub fn new(api_key: &str, base_url: &str, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            from: from.to_string(),
        }
    }

    fn payload(
        &self,
        notification: &Notification,
        recipient: &str,
        subject_template: &str,
    ) -> Result<Value, RelayError> {
        let mut body = json!({
            "from": self.from,
            "to": [recipient],
            "subject": notification.subject(subject_template),
            "html": notification.html()?,
        });

        if !notification.attachments().is_empty() {
            let attachments: Vec<Value> = notification
                .attachments()
                .iter()
                .map(|a| {
                    json!({
                        "filename": a.file_name,
                        "content": STANDARD.encode(&a.content),
                    })
                })
                .collect();
            body["attachments"] = Value::Array(attachments);
        }

        Ok(body)
    }
}

#[async_trait]
impl NotificationRelay for ResendRelay {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(
        &self,
        notification: &Notification,
        recipient: &str,
        subject_template: &str,
    ) -> Result<RelayReceipt, RelayError> {
        let body = self.payload(notification, recipient, subject_template)?;

        let resp = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                body: text.chars().take(1024).collect(),
            });
        }

        let id = serde_json::from_str::<SendResponse>(&text)
            .ok()
            .and_then(|r| r.id);
        Ok(RelayReceipt { id })
    }
}
