//! A file picked by the user for upload.

use std::path::Path;

use crate::error::ClientError;

pub const PDF_MIME: &str = "application/pdf";
const OCTET_STREAM_MIME: &str = "application/octet-stream";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// File name, detected content type and raw bytes of one upload.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    /// Build from in-memory bytes, sniffing the content type.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = detect_content_type(&name, &bytes).to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_MIME
    }
}

/// A file counts as a PDF when it carries the `%PDF-` signature or, failing
/// that, a `.pdf` extension.
pub fn detect_content_type(name: &str, bytes: &[u8]) -> &'static str {
    let has_extension = Path::new(name)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if bytes.starts_with(PDF_MAGIC) || has_extension {
        PDF_MIME
    } else {
        OCTET_STREAM_MIME
    }
}
