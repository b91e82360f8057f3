use serde::Serialize;
use utoipa::ToSchema;

/// Multipart form accepted by the upload endpoint.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// A `video/*`, `audio/*` or `image/*` file.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}
