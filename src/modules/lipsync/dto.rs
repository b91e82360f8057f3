use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::validation::not_blank;

/// Lip-sync from media that is already reachable by URL.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LipSyncRequest {
    #[serde(default)]
    #[validate(url(message = "videoUrl must be a valid URL"))]
    pub video_url: String,
    /// Spoken with the configured voice when no audio is given.
    pub script: Option<String>,
    #[validate(url(message = "audioUrl must be a valid URL"))]
    pub audio_url: Option<String>,
}

/// Multipart form accepted by the upload variant.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct LipSyncUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub video: Vec<u8>,
    pub script: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub audio: Option<Vec<u8>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LipSyncJobResponse {
    pub job_id: String,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LipSyncStatusQuery {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "jobId is required"))]
    pub job_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LipSyncResponse {
    pub video_url: String,
}
