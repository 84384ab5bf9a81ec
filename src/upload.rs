//! Upload sources and pre-upload validation

use crate::defaults::limits::{MAX_PDF_BYTES, MAX_ZIP_BYTES};
use crate::error::PortalError;
use crate::utils::{format_file_size, mime::guess_mime};
use bytes::Bytes;
use std::path::Path;

/// A document ready to be sent as a multipart file part.
#[derive(Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Bytes,
    pub mime_type: String,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

impl UploadFile {
    /// Wrap in-memory content; the MIME type is guessed from the content,
    /// then from the file name.
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let bytes = bytes.into();
        let mime_type = guess_mime(Some(bytes.as_ref()), Some(file_name.as_str()));
        Self {
            file_name,
            bytes,
            mime_type,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, PortalError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PortalError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(file_name, bytes))
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Multipart file part sharing this file's buffer; the length is known
    /// up front so the request keeps a `Content-Length`.
    pub(crate) fn to_part(&self) -> Result<reqwest::multipart::Part, PortalError> {
        let body = reqwest::Body::from(self.bytes.clone());
        reqwest::multipart::Part::stream_with_length(body, self.size())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime_type)
            .map_err(|e| PortalError::InvalidInput(format!("Invalid MIME type: {e}")))
    }
}

/// The two admin upload flows and their constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    /// One fleet document, `.pdf`, up to 10 MB
    SinglePdf,
    /// An archive of documents, `.zip`, up to 50 MB
    BulkZip,
}

impl UploadKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::SinglePdf => ".pdf",
            Self::BulkZip => ".zip",
        }
    }

    pub fn max_bytes(self) -> u64 {
        match self {
            Self::SinglePdf => MAX_PDF_BYTES,
            Self::BulkZip => MAX_ZIP_BYTES,
        }
    }

    /// Whether the file name carries this kind's extension (case-insensitive).
    pub fn accepts_name(self, file_name: &str) -> bool {
        file_name.to_lowercase().ends_with(self.extension())
    }

    pub fn validate(self, file: &UploadFile) -> Result<(), PortalError> {
        if !self.accepts_name(&file.file_name) {
            let msg = match self {
                Self::SinglePdf => "Only PDF files are allowed for single upload",
                Self::BulkZip => "Only ZIP files are allowed for bulk upload",
            };
            return Err(PortalError::InvalidInput(msg.to_string()));
        }
        if file.size() > self.max_bytes() {
            return Err(PortalError::InvalidInput(format!(
                "{} is {}, the limit is {}",
                file.file_name,
                format_file_size(file.size()),
                format_file_size(self.max_bytes())
            )));
        }
        Ok(())
    }
}
