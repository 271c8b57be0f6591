use axum::http::HeaderMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl Locale {
    /// Pick a locale from the first language tag in `Accept-Language`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let primary = headers
            .get("accept-language")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|tag| tag.split(';').next().unwrap_or("").trim().to_ascii_lowercase());

        match primary {
            Some(tag) if tag == "es" || tag.starts_with("es-") => Locale::Es,
            _ => Locale::En,
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Es => &ES,
        }
    }
}

/// User-facing strings for one language.
#[derive(Debug)]
pub struct Messages {
    pub company_name_required: &'static str,
    pub contact_person_required: &'static str,
    pub email_required: &'static str,
    pub email_invalid: &'static str,
    pub project_description_required: &'static str,
    pub name_required: &'static str,
    pub field_required: &'static str,
    min_words: &'static str,
    pub cv_required: &'static str,
    pub cv_not_pdf: &'static str,
    pub submitted: &'static str,
    pub invalid_fields: &'static str,
    pub upload_failed: &'static str,
    pub connection_error: &'static str,
}

impl Messages {
    pub fn min_words(&self, min: usize, count: usize) -> String {
        self.min_words
            .replace("{min}", &min.to_string())
            .replace("{count}", &count.to_string())
    }
}

static EN: Messages = Messages {
    company_name_required: "Company Name is required.",
    contact_person_required: "Contact Person is required.",
    email_required: "Email is required.",
    email_invalid: "Please enter a valid email address.",
    project_description_required: "Project Description is required.",
    name_required: "Name is required.",
    field_required: "This field is required.",
    min_words: "You must write at least {min} words. You have {count}.",
    cv_required: "You must attach your CV (PDF).",
    cv_not_pdf: "Error: Please upload PDF files only.",
    submitted: "Form submitted successfully.",
    invalid_fields: "Please correct the highlighted fields.",
    upload_failed: "We could not process your attachment. Please try again later.",
    connection_error: "Connection error. Please try again later.",
};

static ES: Messages = Messages {
    company_name_required: "El nombre de la empresa es obligatorio.",
    contact_person_required: "La persona de contacto es obligatoria.",
    email_required: "El correo electrónico es obligatorio.",
    email_invalid: "Por favor, introduce un correo electrónico válido.",
    project_description_required: "La descripción del proyecto es obligatoria.",
    name_required: "El nombre es obligatorio.",
    field_required: "Este campo es obligatorio.",
    min_words: "Debes escribir al menos {min} palabras. Llevas {count}.",
    cv_required: "Debes adjuntar tu CV (PDF).",
    cv_not_pdf: "Error: Por favor, sube solo archivos PDF.",
    submitted: "Formulario enviado exitosamente.",
    invalid_fields: "Por favor, corrige los campos marcados.",
    upload_failed: "No pudimos procesar tu archivo. Inténtalo de nuevo más tarde.",
    connection_error: "Error de conexión. Inténtalo de nuevo más tarde.",
};
