use std::collections::HashMap;

use axum::http::HeaderMap;
use serde_json::Value;

use crate::models::{Attachment, ClientInquiry, FormKind, JobApplication, Submission};

const INQUIRY_FIELDS: [&str; 4] = [
    "companyName",
    "contactPerson",
    "clientEmail",
    "projectDescription",
];
const APPLICATION_FIELDS: [&str; 2] = ["name", "howHeavy"];
const CV_FIELD: &str = "cvFile";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(String),
    #[error("Invalid form encoding: {0}")]
    Form(String),
    #[error("Multipart error: {0}")]
    Multipart(String),
    #[error("Field {0} must be a string")]
    NotText(String),
    #[error("Unrecognized form")]
    UnknownForm,
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Fields and files of a request body, before the form kind is known.
#[derive(Debug, Default)]
pub struct RawForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, Attachment>,
}

impl RawForm {
    fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key) || self.files.contains_key(key)
    }

    fn take(&mut self, key: &str) -> String {
        self.fields.remove(key).unwrap_or_default()
    }
}

/// Parse a request body, dispatching on Content-Type.
pub async fn parse_request(headers: &HeaderMap, body: bytes::Bytes) -> Result<RawForm, ParseError> {
    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());

    if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parse_multipart(headers, body).await
    } else {
        parse_body(content_type, &body)
    }
}

/// Parse a JSON or urlencoded body.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RawForm, ParseError> {
    let ct = content_type.unwrap_or("application/json");

    if ct.contains("application/json") {
        parse_json(body)
    } else if ct.contains("application/x-www-form-urlencoded") {
        parse_form_urlencoded(body)
    } else {
        parse_json(body).or_else(|_| parse_form_urlencoded(body))
    }
}

fn parse_json(body: &[u8]) -> Result<RawForm, ParseError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| ParseError::Json(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(ParseError::Json("expected an object".to_string()));
    };

    let mut form = RawForm::default();
    for (key, value) in obj {
        match value {
            Value::String(s) => {
                form.fields.insert(key, s);
            }
            Value::Null => {}
            _ => return Err(ParseError::NotText(key)),
        }
    }
    Ok(form)
}

fn parse_form_urlencoded(body: &[u8]) -> Result<RawForm, ParseError> {
    let body_str = std::str::from_utf8(body).map_err(|e| ParseError::Form(e.to_string()))?;
    let fields = form_urlencoded::parse(body_str.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    Ok(RawForm {
        fields,
        files: HashMap::new(),
    })
}

/// Parse multipart form data using multer. File parts are buffered in memory.
pub async fn parse_multipart(
    headers: &HeaderMap,
    body: bytes::Bytes,
) -> Result<RawForm, ParseError> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| ParseError::Multipart("missing boundary".to_string()))?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = RawForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ParseError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or("unknown").to_string();

        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ParseError::Multipart(e.to_string()))?;

                // Browsers send an empty nameless part when no file was chosen.
                if file_name.is_empty() && content.is_empty() {
                    continue;
                }

                form.files.insert(
                    name,
                    Attachment {
                        file_name,
                        content_type,
                        content,
                    },
                );
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ParseError::Multipart(e.to_string()))?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}

/// Decide the form kind from field presence, unless the route pins it.
pub fn discriminate(raw: &RawForm, pinned: Option<FormKind>) -> Result<FormKind, ParseError> {
    if let Some(kind) = pinned {
        return Ok(kind);
    }
    if raw.has("companyName") {
        Ok(FormKind::ClientInquiry)
    } else if raw.has("howHeavy") || raw.has(CV_FIELD) {
        Ok(FormKind::JobApplication)
    } else {
        Err(ParseError::UnknownForm)
    }
}

/// Build a typed submission from a parsed body.
pub fn into_submission(
    mut raw: RawForm,
    pinned: Option<FormKind>,
) -> Result<Submission, ParseError> {
    let kind = discriminate(&raw, pinned)?;

    let required: &[&'static str] = match kind {
        FormKind::ClientInquiry => &INQUIRY_FIELDS,
        FormKind::JobApplication => &APPLICATION_FIELDS,
    };
    let missing: Vec<&'static str> = required
        .iter()
        .copied()
        .filter(|key| !raw.fields.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingFields(missing));
    }

    let submission = match kind {
        FormKind::ClientInquiry => Submission::ClientInquiry(ClientInquiry {
            company_name: raw.take("companyName"),
            contact_person: raw.take("contactPerson"),
            client_email: raw.take("clientEmail"),
            client_phone: raw.fields.remove("clientPhone"),
            project_description: raw.take("projectDescription"),
        }),
        FormKind::JobApplication => Submission::JobApplication(JobApplication {
            name: raw.take("name"),
            how_heavy: raw.take("howHeavy"),
            cv_file: raw.files.remove(CV_FIELD),
        }),
    };

    Ok(submission)
}
