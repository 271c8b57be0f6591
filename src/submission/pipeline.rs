use crate::error::SubmitError;
use crate::i18n::Messages;
use crate::models::{Attachment, FormKind, Submission};
use crate::relay::{Notification, RelayReceipt};
use crate::state::{AppState, Delivery};
use crate::storage::{ObjectUploader, ScratchDir, UploadResult};

use super::validation;

pub struct PipelineResult {
    pub link: Option<String>,
    pub receipt: RelayReceipt,
}

/// Validate, upload the attachment if configured to, then relay.
///
/// Stops at the first failure. The relay is never called unless any
/// required upload succeeded.
pub async fn run(
    state: &AppState,
    submission: Submission,
    messages: &Messages,
) -> Result<PipelineResult, SubmitError> {
    let result = validation::validate(&submission, messages);
    if !result.is_valid() {
        return Err(SubmitError::Validation(result));
    }

    let link = match (&state.delivery, submission.attachment()) {
        (Delivery::Upload { uploader, folder_id }, Some(attachment)) => {
            upload_attachment(&state.scratch, uploader.as_ref(), folder_id, attachment)
                .await?
                .link
        }
        _ => None,
    };

    let inline = matches!(state.delivery, Delivery::Inline);
    let notification = Notification::new(&submission, link.clone(), inline);

    let subject_template = match submission.kind() {
        FormKind::ClientInquiry => &state.config.subjects.inquiry,
        FormKind::JobApplication => &state.config.subjects.application,
    };

    let receipt = state
        .relay
        .send(&notification, &state.config.recipient, subject_template)
        .await?;

    tracing::info!(
        kind = ?submission.kind(),
        relay = state.relay.name(),
        id = receipt.id.as_deref().unwrap_or("-"),
        "Submission relayed"
    );

    Ok(PipelineResult { link, receipt })
}

/// Stage, upload, release. The staged file is gone when this returns.
async fn upload_attachment(
    scratch: &ScratchDir,
    uploader: &dyn ObjectUploader,
    folder_id: &str,
    attachment: &Attachment,
) -> Result<UploadResult, SubmitError> {
    let staged = scratch
        .stage(&attachment.content, &attachment.file_name)
        .await?;

    let uploaded = uploader
        .upload(staged.path(), &attachment.file_name, folder_id)
        .await;
    staged.release().await;

    Ok(uploaded?)
}
