pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod relay;
pub mod routes;
pub mod state;
pub mod storage;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{AttachmentDelivery, Config, RelayConfig};
use crate::relay::{FormspreeRelay, NotificationRelay, ResendRelay, SmtpRelay};
use crate::state::{AppState, Delivery, SharedState};
use crate::storage::{DriveUploader, ScratchDir};

/// Construct the provider adapters named by the configuration.
pub fn build_state(config: Config) -> Result<AppState, String> {
    config.check()?;

    let relay: Arc<dyn NotificationRelay> = match &config.relay {
        RelayConfig::Resend { api_key, base_url } => {
            Arc::new(ResendRelay::new(api_key, base_url, &config.from))
        }
        RelayConfig::Smtp(smtp) => Arc::new(SmtpRelay::new(smtp, &config.from)?),
        RelayConfig::Formspree { endpoint } => Arc::new(FormspreeRelay::new(endpoint)),
    };
    tracing::info!("Relaying submissions through {}", relay.name());

    let delivery = match &config.attachments {
        AttachmentDelivery::Inline => Delivery::Inline,
        AttachmentDelivery::Drive(drive) => {
            let uploader =
                DriveUploader::from_key_file(&drive.credentials_path, &drive.upload_url)?;
            tracing::info!("Attachments upload to Drive folder {}", drive.folder_id);
            Delivery::Upload {
                uploader: Arc::new(uploader),
                folder_id: drive.folder_id.clone(),
            }
        }
    };

    let scratch = ScratchDir::new(&config.scratch_dir).map_err(|e| e.to_string())?;

    Ok(AppState {
        config,
        relay,
        delivery,
        scratch,
    })
}

pub fn build_app(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;
    let static_dir = state.config.static_dir.clone();
    let state: SharedState = Arc::new(state);

    Router::new()
        .merge(routes::submit_routes())
        .route("/health", axum::routing::get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
