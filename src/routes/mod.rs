pub mod submit;

use axum::routing::post;
use axum::Router;

use crate::state::SharedState;

pub fn submit_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/submit-form", post(submit::submit_form))
        .route("/api/client-inquiry", post(submit::client_inquiry))
        .route("/api/job-application", post(submit::job_application))
}
