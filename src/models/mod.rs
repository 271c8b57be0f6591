pub mod submission;

pub use submission::{Attachment, ClientInquiry, FormKind, JobApplication, Submission};
