//! Upload intake: accepts a resume upload, validates it and prepares the
//! base64 payload sent to the analysis service.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

pub const PDF_MIME: &str = "application/pdf";
/// Largest accepted resume, in bytes (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
/// Slack on top of `MAX_UPLOAD_BYTES` for multipart framing, so that files
/// slightly over the limit reach the size check instead of the body limit.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
/// Multipart field carrying the resume.
pub const UPLOAD_FIELD: &str = "file";

pub const VALIDATION_MESSAGE: &str = "Please upload a valid PDF file (max 10MB)";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("file exceeds the 10 MB limit")]
    TooLarge,

    #[error("no 'file' field in upload")]
    MissingFile,

    #[error("I/O error while reading upload: {0}")]
    Read(String),
}

impl IntakeError {
    /// Validation failures are the user's to fix; read failures are not.
    pub fn is_validation(&self) -> bool {
        !matches!(self, IntakeError::Read(_))
    }

    pub fn user_message(&self) -> String {
        if self.is_validation() {
            VALIDATION_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

impl From<MultipartError> for IntakeError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            IntakeError::TooLarge
        } else {
            IntakeError::Read(err.body_text())
        }
    }
}

/// A validated resume held in memory for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    name: String,
    content_type: String,
    bytes: Bytes,
}

impl UploadedDocument {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Size in megabytes, as shown next to the file name.
    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0 / 1024.0
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Resolves the MIME type of an upload. The declared type wins unless it is
/// missing or generic, in which case the file extension decides.
pub fn resolve_content_type(name: &str, declared: Option<&str>) -> String {
    let declared = declared
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

    match declared {
        Some(ct) => ct,
        None => mime_guess::from_path(name)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}

/// Validates an upload and wraps it as an `UploadedDocument`.
pub fn accept(
    name: &str,
    declared_content_type: Option<&str>,
    bytes: Bytes,
) -> Result<UploadedDocument, IntakeError> {
    let content_type = resolve_content_type(name, declared_content_type);
    if content_type != PDF_MIME {
        return Err(IntakeError::UnsupportedType(content_type));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(IntakeError::TooLarge);
    }

    Ok(UploadedDocument {
        name: name.to_string(),
        content_type,
        bytes,
    })
}

/// Reads the `file` part of a multipart upload and validates it.
pub async fn from_multipart(multipart: &mut Multipart) -> Result<UploadedDocument, IntakeError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or("resume.pdf").to_string();
        let declared = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        debug!(
            "Received upload '{}' ({} bytes, declared {:?})",
            name,
            bytes.len(),
            declared
        );

        return accept(&name, declared.as_deref(), bytes);
    }

    Err(IntakeError::MissingFile)
}
