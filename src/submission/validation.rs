use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::i18n::Messages;
use crate::models::{ClientInquiry, JobApplication, Submission};

pub const MIN_WORDS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Per-field error messages. An empty message means the field passed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: BTreeMap<&'static str, String>,
}

impl ValidationResult {
    fn new(errors: BTreeMap<&'static str, String>) -> Self {
        let is_valid = errors.values().all(|msg| msg.is_empty());
        Self { is_valid, errors }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &BTreeMap<&'static str, String> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> &str {
        self.errors.get(field).map(String::as_str).unwrap_or("")
    }

    /// Names of the fields that failed.
    pub fn failed_fields(&self) -> Vec<&'static str> {
        self.errors
            .iter()
            .filter(|(_, msg)| !msg.is_empty())
            .map(|(field, _)| *field)
            .collect()
    }
}

/// Check every field of a submission. All rules run; none short-circuit.
pub fn validate(submission: &Submission, messages: &Messages) -> ValidationResult {
    match submission {
        Submission::ClientInquiry(inquiry) => validate_inquiry(inquiry, messages),
        Submission::JobApplication(app) => validate_application(app, messages),
    }
}

fn validate_inquiry(inquiry: &ClientInquiry, messages: &Messages) -> ValidationResult {
    let mut errors = BTreeMap::new();

    errors.insert(
        "companyName",
        required(&inquiry.company_name, messages.company_name_required),
    );
    errors.insert(
        "contactPerson",
        required(&inquiry.contact_person, messages.contact_person_required),
    );

    // Blankness is judged on the trimmed value, format on the raw one.
    let email_error = if inquiry.client_email.trim().is_empty() {
        messages.email_required.to_string()
    } else if !EMAIL_RE.is_match(&inquiry.client_email) {
        messages.email_invalid.to_string()
    } else {
        String::new()
    };
    errors.insert("clientEmail", email_error);

    errors.insert(
        "projectDescription",
        required(&inquiry.project_description, messages.project_description_required),
    );

    ValidationResult::new(errors)
}

fn validate_application(app: &JobApplication, messages: &Messages) -> ValidationResult {
    let mut errors = BTreeMap::new();

    errors.insert("name", required(&app.name, messages.name_required));

    let how_heavy = app.how_heavy.trim();
    let words = word_count(how_heavy);
    let how_heavy_error = if how_heavy.is_empty() {
        messages.field_required.to_string()
    } else if words < MIN_WORDS {
        messages.min_words(MIN_WORDS, words)
    } else {
        String::new()
    };
    errors.insert("howHeavy", how_heavy_error);

    let cv_error = match &app.cv_file {
        None => messages.cv_required.to_string(),
        Some(file) if !file.is_pdf() => messages.cv_not_pdf.to_string(),
        Some(_) => String::new(),
    };
    errors.insert("cvFile", cv_error);

    ValidationResult::new(errors)
}

fn required(value: &str, message: &str) -> String {
    if value.trim().is_empty() {
        message.to_string()
    } else {
        String::new()
    }
}

/// Count whitespace-delimited words; runs of whitespace count once.
pub fn word_count(text: &str) -> usize {
    WHITESPACE_RE
        .split(text.trim())
        .filter(|word| !word.is_empty())
        .count()
}
