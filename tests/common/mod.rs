#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use formrelay::config::{AttachmentDelivery, Config, RelayConfig, SubjectTemplates};
use formrelay::relay::{Notification, NotificationRelay, RelayError, RelayReceipt};
use formrelay::state::{AppState, Delivery};
use formrelay::storage::{ObjectUploader, ScratchDir, UploadError, UploadResult};

pub const RECIPIENT: &str = "team@example.com";
pub const FOLDER_ID: &str = "folder-123";
pub const DRIVE_LINK: &str = "https://drive.google.com/file/d/file-1/view";

/// One call seen by [`RecordingRelay`].
#[derive(Debug, Clone)]
pub struct Relayed {
    pub recipient: String,
    pub subject: String,
    pub fields: Vec<(String, String)>,
    pub link: Option<String>,
    pub attachments: Vec<String>,
}

impl Relayed {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct RecordingRelay {
    pub fail: bool,
    pub calls: Mutex<Vec<Relayed>>,
}

impl RecordingRelay {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Relayed> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRelay for RecordingRelay {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(
        &self,
        notification: &Notification,
        recipient: &str,
        subject_template: &str,
    ) -> Result<RelayReceipt, RelayError> {
        self.calls.lock().unwrap().push(Relayed {
            recipient: recipient.to_string(),
            subject: notification.subject(subject_template),
            fields: notification
                .fields()
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            link: notification.link().map(str::to_string),
            attachments: notification
                .attachments()
                .iter()
                .map(|a| a.file_name.clone())
                .collect(),
        });

        if self.fail {
            return Err(RelayError::Rejected {
                status: 503,
                body: "upstream exploded: api key re_live_123".to_string(),
            });
        }
        Ok(RelayReceipt {
            id: Some("msg-1".to_string()),
        })
    }
}

/// Uploader that checks the staged file exists while it is being uploaded.
#[derive(Default)]
pub struct FakeUploader {
    pub fail: bool,
    pub uploads: Mutex<Vec<(PathBuf, String, String, bool)>>,
}

impl FakeUploader {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// (staged path, file name, folder, staged file existed during upload)
    pub fn uploads(&self) -> Vec<(PathBuf, String, String, bool)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectUploader for FakeUploader {
    async fn upload(
        &self,
        path: &Path,
        file_name: &str,
        folder_id: &str,
    ) -> Result<UploadResult, UploadError> {
        self.uploads.lock().unwrap().push((
            path.to_path_buf(),
            file_name.to_string(),
            folder_id.to_string(),
            path.exists(),
        ));

        if self.fail {
            return Err(UploadError::Rejected {
                status: 404,
                body: "File not found: folder-123".to_string(),
            });
        }
        Ok(UploadResult {
            remote_id: "file-1".to_string(),
            link: Some(DRIVE_LINK.to_string()),
        })
    }
}

pub fn test_config(scratch_dir: &Path, attachments: AttachmentDelivery) -> Config {
    Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        log_level: "warn".to_string(),
        max_body_size: 64 * 1024,
        static_dir: scratch_dir.join("static"),
        scratch_dir: scratch_dir.to_path_buf(),
        recipient: RECIPIENT.to_string(),
        from: "Forms <forms@example.com>".to_string(),
        subjects: SubjectTemplates::default(),
        relay: RelayConfig::Resend {
            api_key: "re_test".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
        },
        attachments,
    }
}

/// A running test server instance with its own scratch directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub relay: Arc<RecordingRelay>,
    pub uploader: Option<Arc<FakeUploader>>,
    pub scratch: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Names currently present in the scratch directory (ignores `static`).
    pub fn scratch_listing(&self) -> Vec<String> {
        std::fs::read_dir(self.scratch.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name != "static")
            .collect()
    }

    pub async fn submit_json(&self, path: &str, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .json(data)
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn submit_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("submit multipart failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

pub fn valid_inquiry() -> Value {
    json!({
        "companyName": "Acme Corp",
        "contactPerson": "Jordan Lee",
        "clientEmail": "jordan@acme.com",
        "clientPhone": "+1 555 0100",
        "projectDescription": "We need a new storefront and a paid social plan.",
    })
}

pub const TEN_WORDS: &str = "I ship campaigns fast and I measure every single result";

pub fn application_form(
    cv: Option<(&'static str, &'static str, &'static [u8])>,
) -> reqwest::multipart::Form {
    let form = reqwest::multipart::Form::new()
        .text("name", "Sam Rivera")
        .text("howHeavy", TEN_WORDS);
    match cv {
        Some((file_name, mime, bytes)) => form.part(
            "cvFile",
            reqwest::multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(mime)
                .unwrap(),
        ),
        None => form,
    }
}

/// Spawn the app with inline attachment delivery.
pub async fn spawn_app(relay: RecordingRelay) -> TestApp {
    spawn(relay, None).await
}

/// Spawn the app with staged uploads going to `uploader`.
pub async fn spawn_app_with_uploads(relay: RecordingRelay, uploader: FakeUploader) -> TestApp {
    spawn(relay, Some(uploader)).await
}

async fn spawn(relay: RecordingRelay, uploader: Option<FakeUploader>) -> TestApp {
    let scratch = tempfile::tempdir().expect("Failed to create scratch dir");
    let relay = Arc::new(relay);
    let uploader = uploader.map(Arc::new);

    let (attachments, delivery) = match &uploader {
        Some(uploader) => (
            AttachmentDelivery::Drive(formrelay::config::DriveConfig {
                credentials_path: PathBuf::from("unused.json"),
                folder_id: FOLDER_ID.to_string(),
                upload_url: "http://127.0.0.1:1".to_string(),
            }),
            Delivery::Upload {
                uploader: uploader.clone(),
                folder_id: FOLDER_ID.to_string(),
            },
        ),
        None => (AttachmentDelivery::Inline, Delivery::Inline),
    };

    let state = AppState {
        config: test_config(scratch.path(), attachments),
        relay: relay.clone(),
        delivery,
        scratch: ScratchDir::new(scratch.path()).unwrap(),
    };
    let app = formrelay::build_app(state);

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
        relay,
        uploader,
        scratch,
    }
}
