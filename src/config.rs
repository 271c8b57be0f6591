use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub max_body_size: usize,
    pub static_dir: PathBuf,
    pub scratch_dir: PathBuf,
    pub recipient: String,
    pub from: String,
    pub subjects: SubjectTemplates,
    pub relay: RelayConfig,
    pub attachments: AttachmentDelivery,
}

#[derive(Debug, Clone)]
pub struct SubjectTemplates {
    pub inquiry: String,
    pub application: String,
}

impl Default for SubjectTemplates {
    fn default() -> Self {
        Self {
            inquiry: "New Client Inquiry from {{companyName}}".to_string(),
            application: "New Job Application from {{name}}".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum RelayConfig {
    Resend { api_key: String, base_url: String },
    Smtp(SmtpConfig),
    Formspree { endpoint: String },
}

impl RelayConfig {
    /// Whether the provider can carry attachment bytes itself.
    pub fn accepts_attachments(&self) -> bool {
        !matches!(self, RelayConfig::Formspree { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub pass: String,
}

/// Where a job application's attachment goes.
#[derive(Debug, Clone)]
pub enum AttachmentDelivery {
    /// Attached directly to the relayed message.
    Inline,
    /// Staged, uploaded to Drive, and linked from the relayed message.
    Drive(DriveConfig),
}

#[derive(Debug, Clone)]
pub struct DriveConfig {
    pub credentials_path: PathBuf,
    pub folder_id: String,
    pub upload_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("FORMRELAY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_HOST: {e}"))?;

        let port: u16 = env_or("FORMRELAY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_PORT: {e}"))?;

        let log_level = log_level_from_env();

        let max_body_size: usize = env_or("FORMRELAY_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid FORMRELAY_MAX_BODY_SIZE: {e}"))?;

        let static_dir = PathBuf::from(env_or("FORMRELAY_STATIC_DIR", "static"));
        let scratch_dir = std::env::var("FORMRELAY_SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("formrelay"));

        let recipient = env_required("FORMRELAY_RECIPIENT")?;
        let from = env_or("FORMRELAY_FROM", "Forms <onboarding@resend.dev>");

        let defaults = SubjectTemplates::default();
        let subjects = SubjectTemplates {
            inquiry: env_or("FORMRELAY_INQUIRY_SUBJECT", &defaults.inquiry),
            application: env_or("FORMRELAY_APPLICATION_SUBJECT", &defaults.application),
        };

        let relay = match env_or("FORMRELAY_RELAY", "resend").as_str() {
            "resend" => RelayConfig::Resend {
                api_key: env_required("RESEND_API_KEY")?,
                base_url: env_or("FORMRELAY_RESEND_URL", "https://api.resend.com"),
            },
            "smtp" => RelayConfig::Smtp(SmtpConfig {
                host: env_required("FORMRELAY_SMTP_HOST")?,
                port: env_or("FORMRELAY_SMTP_PORT", "587")
                    .parse()
                    .map_err(|e| format!("Invalid FORMRELAY_SMTP_PORT: {e}"))?,
                user: env_required("FORMRELAY_SMTP_USER")?,
                pass: env_required("FORMRELAY_SMTP_PASS")?,
            }),
            "formspree" => RelayConfig::Formspree {
                endpoint: env_required("FORMSPREE_ENDPOINT")?,
            },
            other => return Err(format!("Invalid FORMRELAY_RELAY: {other}")),
        };

        let attachments = match env_or("FORMRELAY_ATTACHMENTS", "inline").as_str() {
            "inline" => AttachmentDelivery::Inline,
            "drive" => AttachmentDelivery::Drive(DriveConfig {
                credentials_path: PathBuf::from(env_required("GOOGLE_APPLICATION_CREDENTIALS")?),
                folder_id: env_required("GOOGLE_DRIVE_FOLDER_ID")?,
                upload_url: env_or(
                    "FORMRELAY_DRIVE_UPLOAD_URL",
                    "https://www.googleapis.com/upload/drive/v3/files",
                ),
            }),
            other => return Err(format!("Invalid FORMRELAY_ATTACHMENTS: {other}")),
        };

        let config = Config {
            host,
            port,
            log_level,
            max_body_size,
            static_dir,
            scratch_dir,
            recipient,
            from,
            subjects,
            relay,
            attachments,
        };
        config.check()?;
        Ok(config)
    }

    /// Reject provider combinations that cannot deliver an attachment.
    pub fn check(&self) -> Result<(), String> {
        let inline = matches!(self.attachments, AttachmentDelivery::Inline);
        if inline && !self.relay.accepts_attachments() {
            return Err(concat!(
                "FORMRELAY_RELAY=formspree cannot carry attachments; ",
                "set FORMRELAY_ATTACHMENTS=drive"
            )
            .to_string());
        }
        Ok(())
    }
}

/// Fallback tracing filter. Readable before the rest of the config so that
/// configuration errors can be logged.
pub fn log_level_from_env() -> String {
    env_or("FORMRELAY_LOG_LEVEL", "info")
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
