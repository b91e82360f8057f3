use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::dto::{UploadForm, UploadResponse};
use super::service::MediaService;
use crate::common::error::{AppError, AppResult};
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::common::upload::{UploadedFile, read_file_field};
use crate::state::AppState;

/// Upload a media file to object storage
#[utoipa::path(
    post,
    path = "/api/v1/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored file URL", body = UploadResponse),
        (status = 400, description = "Missing file or unsupported type", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "Media"
)]
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let file = match read_upload(&mut multipart).await {
        Ok(file) => file,
        Err(e) => return e.into_response(),
    };

    match MediaService::store(&state, file).await {
        Ok(asset) => ApiSuccess(UploadResponse { url: asset.url }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn read_upload(multipart: &mut Multipart) -> AppResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            return read_file_field(field, &[mime::VIDEO, mime::AUDIO, mime::IMAGE]).await;
        }
    }

    Err(AppError::validation("No file field found in multipart request"))
}
