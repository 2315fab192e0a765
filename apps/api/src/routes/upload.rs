use axum::extract::Multipart;
use tracing::debug;

use crate::errors::AppError;
use crate::models::document::UploadedDocument;

const FILE_FIELD: &str = "file";
const JOB_DESCRIPTION_FIELD: &str = "job_description";

/// A parsed upload: exactly one file plus an optional job description.
#[derive(Debug)]
pub struct UploadForm {
    pub document: UploadedDocument,
    pub job_description: Option<String>,
}

/// Reads the multipart body. Unknown fields are ignored; a blank job
/// description counts as absent.
pub async fn read_upload_form(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<UploadForm, AppError> {
    let mut document: Option<UploadedDocument> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                if document.is_some() {
                    return Err(AppError::Validation(
                        "Only one file may be uploaded at a time".to_string(),
                    ));
                }
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let media_type = field.content_type().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if bytes.len() > max_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "'{file_name}' is {} bytes; the limit is {max_bytes} bytes",
                        bytes.len()
                    )));
                }
                debug!("Received '{file_name}' ({media_type}, {} bytes)", bytes.len());
                document = Some(UploadedDocument::new(file_name, media_type, bytes));
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                let text = field.text().await?;
                job_description = Some(text).filter(|jd| !jd.trim().is_empty());
            }
            _ => {}
        }
    }

    let document = document
        .ok_or_else(|| AppError::Validation(format!("Missing '{FILE_FIELD}' field")))?;
    Ok(UploadForm {
        document,
        job_description,
    })
}
