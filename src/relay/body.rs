use askama::Template;

use super::{Notification, RelayError};
use crate::models::FormKind;

#[derive(Template)]
#[template(path = "email/client_inquiry.html")]
struct ClientInquiryEmail<'a> {
    company_name: &'a str,
    contact_person: &'a str,
    client_email: &'a str,
    client_phone: &'a str,
    project_description: &'a str,
}

#[derive(Template)]
#[template(path = "email/job_application.html")]
struct JobApplicationEmail<'a> {
    name: &'a str,
    how_heavy: &'a str,
    cv_file: &'a str,
    drive_link: &'a str,
}

/// Render the HTML body for an email relay.
pub fn render(notification: &Notification) -> Result<String, RelayError> {
    let field = |key: &str| notification.get(key).unwrap_or("");

    let rendered = match notification.kind() {
        FormKind::ClientInquiry => ClientInquiryEmail {
            company_name: field("companyName"),
            contact_person: field("contactPerson"),
            client_email: field("clientEmail"),
            client_phone: field("clientPhone"),
            project_description: field("projectDescription"),
        }
        .render(),
        FormKind::JobApplication => JobApplicationEmail {
            name: field("name"),
            how_heavy: field("howHeavy"),
            cv_file: field("cvFile"),
            drive_link: notification.link().unwrap_or(""),
        }
        .render(),
    };

    rendered.map_err(|e| RelayError::Render(e.to_string()))
}
