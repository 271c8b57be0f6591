use bytes::Bytes;
use serde::Serialize;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormKind {
    ClientInquiry,
    JobApplication,
}

/// A parsed form submission. The kind is fixed at the parse boundary.
#[derive(Debug, Clone)]
pub enum Submission {
    ClientInquiry(ClientInquiry),
    JobApplication(JobApplication),
}

impl Submission {
    pub fn kind(&self) -> FormKind {
        match self {
            Submission::ClientInquiry(_) => FormKind::ClientInquiry,
            Submission::JobApplication(_) => FormKind::JobApplication,
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            Submission::ClientInquiry(_) => None,
            Submission::JobApplication(app) => app.cv_file.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientInquiry {
    pub company_name: String,
    pub contact_person: String,
    pub client_email: String,
    pub client_phone: Option<String>,
    pub project_description: String,
}

#[derive(Debug, Clone, Default)]
pub struct JobApplication {
    pub name: String,
    pub how_heavy: String,
    pub cv_file: Option<Attachment>,
}

/// An uploaded file held in memory for the duration of one request.
#[derive(Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub content: Bytes,
}

impl Attachment {
    pub fn is_pdf(&self) -> bool {
        self.content_type
            .split(';')
            .next()
            .is_some_and(|ct| ct.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.content.len())
            .finish()
    }
}
