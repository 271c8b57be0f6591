use std::sync::Arc;

use crate::config::Config;
use crate::relay::NotificationRelay;
use crate::storage::{ObjectUploader, ScratchDir};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub relay: Arc<dyn NotificationRelay>,
    pub delivery: Delivery,
    pub scratch: ScratchDir,
}

/// How job-application attachments reach the recipient.
pub enum Delivery {
    /// Bytes ride on the relay call.
    Inline,
    /// Staged, uploaded, and linked.
    Upload {
        uploader: Arc<dyn ObjectUploader>,
        folder_id: String,
    },
}
