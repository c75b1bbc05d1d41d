//! Resume upload handling: file-type gate, key derivation, public reference.

use tracing::{info, warn};
use uuid::Uuid;

use crate::client::ObjectStoreClient;
use crate::error::{StorageError, StorageResult};

const KEY_PREFIX: &str = "resumes";

/// Persistent reference to a stored resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRef {
    /// Object key inside the bucket, kept for later cleanup.
    pub key: String,
    /// Public URL stored on the application document.
    pub url: String,
}

/// Accepted resume formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResumeFormat {
    Pdf,
    Doc,
    Docx,
}

impl ResumeFormat {
    fn from_filename(filename: &str) -> Option<Self> {
        let extension = filename.rsplit_once('.')?.1;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "doc" => Some(ResumeFormat::Doc),
            "docx" => Some(ResumeFormat::Docx),
            _ => None,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "pdf",
            ResumeFormat::Doc => "doc",
            ResumeFormat::Docx => "docx",
        }
    }

    fn content_type(&self) -> &'static str {
        match self {
            ResumeFormat::Pdf => "application/pdf",
            ResumeFormat::Doc => "application/msword",
            ResumeFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Stores resume files and returns their persistent references.
#[derive(Clone)]
pub struct ResumeStore {
    client: ObjectStoreClient,
}

impl ResumeStore {
    pub fn new(client: ObjectStoreClient) -> Self {
        Self { client }
    }

    /// Validate and upload a resume for `applicant_id`, returning the stored
    /// reference. Only pdf, doc and docx files are accepted.
    pub async fn store(
        &self,
        applicant_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> StorageResult<ResumeRef> {
        let format = ResumeFormat::from_filename(filename)
            .ok_or_else(|| StorageError::UnsupportedFileType(filename.to_string()))?;
        if bytes.is_empty() {
            return Err(StorageError::EmptyFile);
        }

        let key = object_key(applicant_id, format);
        self.client
            .upload_bytes(bytes, &key, format.content_type())
            .await?;

        info!(key = %key, "stored resume");
        Ok(ResumeRef {
            url: self.client.public_url(&key),
            key,
        })
    }

    /// Best-effort removal of a stored resume; failures are logged, not
    /// propagated, so document deletion always wins.
    pub async fn remove(&self, key: &str) {
        if let Err(err) = self.client.delete_object(key).await {
            warn!(key = %key, error = %err, "failed to remove resume object");
        }
    }

    /// Connectivity check for the readiness probe.
    pub async fn check_connectivity(&self) -> StorageResult<()> {
        self.client.check_connectivity().await
    }
}

fn object_key(applicant_id: &str, format: ResumeFormat) -> String {
    format!(
        "{}/{}/{}.{}",
        KEY_PREFIX,
        applicant_id,
        Uuid::new_v4(),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_formats() {
        assert_eq!(
            ResumeFormat::from_filename("cv.pdf"),
            Some(ResumeFormat::Pdf)
        );
        assert_eq!(
            ResumeFormat::from_filename("cv.DOC"),
            Some(ResumeFormat::Doc)
        );
        assert_eq!(
            ResumeFormat::from_filename("my.resume.docx"),
            Some(ResumeFormat::Docx)
        );
    }

    #[test]
    fn rejects_other_formats() {
        assert_eq!(ResumeFormat::from_filename("cv.exe"), None);
        assert_eq!(ResumeFormat::from_filename("cv.txt"), None);
        assert_eq!(ResumeFormat::from_filename("noextension"), None);
    }

    #[test]
    fn content_types() {
        assert_eq!(ResumeFormat::Pdf.content_type(), "application/pdf");
        assert_eq!(ResumeFormat::Doc.content_type(), "application/msword");
        assert!(ResumeFormat::Docx.content_type().contains("wordprocessingml"));
    }

    #[test]
    fn key_layout() {
        let key = object_key("64b0c8f2a1d2e3f4a5b6c7d8", ResumeFormat::Pdf);
        assert!(key.starts_with("resumes/64b0c8f2a1d2e3f4a5b6c7d8/"));
        assert!(key.ends_with(".pdf"));
    }
}
