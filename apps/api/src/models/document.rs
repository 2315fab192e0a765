use bytes::Bytes;
use serde::Serialize;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// The three formats the extractor knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentFormat {
    /// Resolves the format from the declared media type, falling back to the
    /// file name suffix. Returns `None` for anything else.
    pub fn detect(media_type: &str, file_name: &str) -> Option<Self> {
        let media_type = media_type.trim().to_lowercase();
        let file_name = file_name.to_lowercase();

        if media_type == PDF_MEDIA_TYPE || file_name.ends_with(".pdf") {
            Some(DocumentFormat::Pdf)
        } else if media_type == DOCX_MEDIA_TYPE || file_name.ends_with(".docx") {
            Some(DocumentFormat::Docx)
        } else if media_type == TEXT_MEDIA_TYPE || file_name.ends_with(".txt") {
            Some(DocumentFormat::PlainText)
        } else {
            None
        }
    }
}

/// A user-selected file. Immutable once created; replaced wholesale on a new
/// selection.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::detect(&self.media_type, &self.file_name)
    }

    /// Size in megabytes with two decimals, as shown to users.
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.size() as f64 / 1024.0 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_media_type() {
        assert_eq!(
            DocumentFormat::detect("application/pdf", "resume"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::detect(DOCX_MEDIA_TYPE, "resume"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::detect("text/plain", "resume"),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn test_detect_by_suffix_when_media_type_is_generic() {
        assert_eq!(
            DocumentFormat::detect("application/octet-stream", "CV.PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::detect("", "cv.docx"),
            Some(DocumentFormat::Docx)
        );
        assert_eq!(
            DocumentFormat::detect("", "notes.txt"),
            Some(DocumentFormat::PlainText)
        );
    }

    #[test]
    fn test_detect_rejects_other_formats() {
        assert_eq!(DocumentFormat::detect("image/png", "scan.png"), None);
        assert_eq!(DocumentFormat::detect("application/msword", "old.doc"), None);
    }

    #[test]
    fn test_size_mb() {
        let doc = UploadedDocument::new("a.txt", "text/plain", Bytes::from(vec![0u8; 1536 * 1024]));
        assert_eq!(doc.size_mb(), "1.50");
    }
}
