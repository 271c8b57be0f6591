use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::SubmitError;
use crate::i18n::Locale;
use crate::models::FormKind;
use crate::state::SharedState;
use crate::submission::pipeline::PipelineResult;
use crate::submission::{parser, pipeline};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    drive_link: Option<String>,
}

/// Either form; the kind is decided from the fields present.
pub async fn submit_form(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, &headers, body, None).await
}

pub async fn client_inquiry(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, &headers, body, Some(FormKind::ClientInquiry)).await
}

pub async fn job_application(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    handle(&state, &headers, body, Some(FormKind::JobApplication)).await
}

async fn handle(
    state: &SharedState,
    headers: &HeaderMap,
    body: Bytes,
    pinned: Option<FormKind>,
) -> Response {
    let locale = Locale::from_headers(headers);

    match process(state, headers, body, pinned, locale).await {
        Ok(result) => (
            StatusCode::OK,
            Json(SubmitResponse {
                message: locale.messages().submitted,
                drive_link: result.link,
            }),
        )
            .into_response(),
        Err(e) => e.into_response_for(locale),
    }
}

async fn process(
    state: &SharedState,
    headers: &HeaderMap,
    body: Bytes,
    pinned: Option<FormKind>,
    locale: Locale,
) -> Result<PipelineResult, SubmitError> {
    let raw = parser::parse_request(headers, body).await?;
    let submission = parser::into_submission(raw, pinned)?;
    pipeline::run(state, submission, locale.messages()).await
}
