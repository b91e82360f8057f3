use axum::{body::Bytes, extract::multipart::Field};
use mime::Mime;
use tracing::info;

use crate::common::error::{AppError, AppResult};

/// A file part read fully into memory, bounded by the request body limit.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Reads a multipart file part, accepting only the given top-level media types.
pub async fn read_file_field(
    field: Field<'_>,
    allowed: &[mime::Name<'static>],
) -> AppResult<UploadedFile> {
    let name = field.name().unwrap_or("file").to_string();
    let file_name = field
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| name.clone());
    let mime = content_type_of(field.content_type(), &file_name);

    if !allowed.iter().any(|t| *t == mime.type_()) {
        let accepted: Vec<String> = allowed.iter().map(|t| format!("{}/*", t)).collect();
        return Err(AppError::validation(format!(
            "Invalid content type {} for '{}': only {} allowed",
            mime,
            name,
            accepted.join(", ")
        )));
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::validation(format!("Failed to read '{}': {}", name, e)))?;
    if bytes.is_empty() {
        return Err(AppError::validation(format!("Uploaded '{}' is empty", name)));
    }

    info!("Received {} ({}, {} bytes)", file_name, mime, bytes.len());

    Ok(UploadedFile {
        file_name,
        content_type: mime.to_string(),
        bytes,
    })
}

/// Declared type unless missing or generic, else guessed from the file name.
fn content_type_of(declared: Option<&str>, file_name: &str) -> Mime {
    declared
        .and_then(|ct| ct.parse::<Mime>().ok())
        .filter(|m| *m != mime::APPLICATION_OCTET_STREAM)
        .unwrap_or_else(|| mime_guess::from_path(file_name).first_or_octet_stream())
}
