use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MailAttachment, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{Notification, NotificationRelay, RelayError, RelayReceipt};
use crate::config::SmtpConfig;
use crate::models::Attachment;

pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpRelay {
    pub fn new(config: &SmtpConfig, from: &str) -> Result<Self, String> {
        let creds = Credentials::new(config.user.clone(), config.pass.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| format!("SMTP relay error: {e}"))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            transport,
            from: from.to_string(),
        })
    }
}

#[async_trait]
impl NotificationRelay for SmtpRelay {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(
        &self,
        notification: &Notification,
        recipient: &str,
        subject_template: &str,
    ) -> Result<RelayReceipt, RelayError> {
        let message = build_message(
            &self.from,
            recipient,
            &notification.subject(subject_template),
            notification.html()?,
            notification.attachments(),
        )?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        Ok(RelayReceipt {
            id: response.message().next().map(str::to_string),
        })
    }
}

pub fn build_message(
    from: &str,
    to: &str,
    subject: &str,
    html: String,
    attachments: &[Attachment],
) -> Result<Message, RelayError> {
    let builder = Message::builder()
        .from(from.parse().map_err(|e| RelayError::Address(format!("from: {e}")))?)
        .to(to.parse().map_err(|e| RelayError::Address(format!("to: {e}")))?)
        .subject(subject);

    let message = if attachments.is_empty() {
        builder.header(ContentType::TEXT_HTML).body(html)
    } else {
        let mut mixed = MultiPart::mixed().singlepart(SinglePart::html(html));
        for attachment in attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .or_else(|_| ContentType::parse("application/octet-stream"))
                .map_err(|e| RelayError::Render(e.to_string()))?;
            mixed = mixed.singlepart(
                MailAttachment::new(attachment.file_name.clone())
                    .body(attachment.content.to_vec(), content_type),
            );
        }
        builder.multipart(mixed)
    };

    message.map_err(|e| RelayError::Render(format!("Failed to build email: {e}")))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn plain_message_is_html() {
        let message = build_message(
            "Forms <forms@example.com>",
            "team@example.com",
            "New Client Inquiry from Acme",
            "<p>hi</p>".to_string(),
            &[],
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: New Client Inquiry from Acme"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[test]
    fn attachments_make_a_mixed_message() {
        let attachment = Attachment {
            file_name: "cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            content: Bytes::from_static(b"%PDF"),
        };
        let message = build_message(
            "forms@example.com",
            "team@example.com",
            "New Job Application from Sam",
            "<p>hi</p>".to_string(),
            &[attachment],
        )
        .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("filename=\"cv.pdf\""));
        assert!(raw.contains("application/pdf"));
    }

    #[test]
    fn bad_recipient_is_an_address_error() {
        let result = build_message("forms@example.com", "not an address", "s", String::new(), &[]);
        assert!(matches!(result, Err(RelayError::Address(_))));
    }
}
