use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Multipart field the resume file is sent under.
pub const RESUME_FIELD: &str = "resume";

/// Media types accepted for upload: PDF, Word (legacy and OOXML), JPEG, PNG, plain text.
pub const ALLOWED_CONTENT_TYPES: [&str; 6] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
    "text/plain",
];

/// A resume file received from the client, held in memory for the lifetime of one request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Checks media type and size. When the client sent no usable media type,
    /// the type is inferred from the file extension.
    pub fn validate(&self, max_bytes: usize) -> Result<(), AppError> {
        let content_type = effective_content_type(&self.content_type, &self.file_name);
        if !content_type.is_some_and(|ct| ALLOWED_CONTENT_TYPES.contains(&ct)) {
            return Err(AppError::UnsupportedMediaType(
                "Please upload a PDF, Word document, image file, or text file.".to_string(),
            ));
        }
        if self.bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if self.size() > max_bytes {
            return Err(AppError::PayloadTooLarge { limit: max_bytes });
        }
        Ok(())
    }

    /// Lossy text view of the file, handed to text-based providers.
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

fn effective_content_type<'a>(declared: &'a str, file_name: &str) -> Option<&'a str> {
    let declared = declared.split(';').next().unwrap_or("").trim();
    if !declared.is_empty() && declared != "application/octet-stream" {
        return Some(declared);
    }
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    let inferred = match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        _ => return None,
    };
    Some(inferred)
}

/// Pulls the `resume` field out of a multipart body. Other fields are skipped.
pub async fn read_resume_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            debug!(field = ?field.name(), "Skipping non-resume multipart field");
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field.content_type().unwrap_or("").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
        return Ok(UploadedFile {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::Validation("No resume file provided".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str, body: &'static [u8]) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(body),
        }
    }

    #[test]
    fn test_accepts_pdf() {
        assert!(file("cv.pdf", "application/pdf", b"%PDF").validate(1024).is_ok());
    }

    #[test]
    fn test_rejects_disallowed_type() {
        let result = file("cv.zip", "application/zip", b"PK").validate(1024);
        assert!(matches!(result, Err(AppError::UnsupportedMediaType(_))));
    }

    #[test]
    fn test_infers_type_from_extension_when_missing() {
        assert!(file("cv.DOCX", "", b"PK").validate(1024).is_ok());
        assert!(file("cv.txt", "application/octet-stream", b"hi").validate(1024).is_ok());
        assert!(file("cv", "", b"hi").validate(1024).is_err());
    }

    #[test]
    fn test_ignores_media_type_parameters() {
        assert!(file("cv.txt", "text/plain; charset=utf-8", b"hi").validate(1024).is_ok());
    }

    #[test]
    fn test_rejects_oversized_and_empty() {
        let big = file("cv.txt", "text/plain", b"0123456789");
        assert!(matches!(
            big.validate(4),
            Err(AppError::PayloadTooLarge { limit: 4 })
        ));
        let empty = file("cv.txt", "text/plain", b"");
        assert!(matches!(empty.validate(4), Err(AppError::Validation(_))));
    }
}
