use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use super::dto::{
    LipSyncJobResponse, LipSyncRequest, LipSyncResponse, LipSyncStatusQuery, LipSyncUploadForm,
};
use super::service::{AudioSource, LipSyncService};
use crate::common::error::{AppError, AppResult};
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::common::upload::{UploadedFile, read_file_field};
use crate::jobs::status::JobStatusResponse;
use crate::state::AppState;

fn parse_request(req: LipSyncRequest) -> AppResult<(String, AudioSource)> {
    req.validate()?;
    let audio = AudioSource::pick(req.script, req.audio_url.map(AudioSource::Url))?;
    Ok((req.video_url, audio))
}

/// Start a lip-sync job from stored media
#[utoipa::path(
    post,
    path = "/api/v1/lipsync/start",
    request_body = LipSyncRequest,
    responses(
        (status = 200, description = "Job submitted", body = LipSyncJobResponse),
        (status = 400, description = "Missing video, or neither script nor audio", body = ErrorBody),
        (status = 500, description = "Speech, storage or lip-sync provider failed", body = ErrorBody)
    ),
    tag = "Lip-sync"
)]
pub async fn start_lipsync(
    State(state): State<AppState>,
    Json(req): Json<LipSyncRequest>,
) -> impl IntoResponse {
    let (video_url, audio) = match parse_request(req) {
        Ok(parsed) => parsed,
        Err(e) => return e.into_response(),
    };

    match LipSyncService::start(state, &video_url, audio).await {
        Ok(job_id) => ApiSuccess(LipSyncJobResponse { job_id }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Check a lip-sync job
#[utoipa::path(
    get,
    path = "/api/v1/lipsync/status",
    params(LipSyncStatusQuery),
    responses(
        (status = 200, description = "Current job status", body = JobStatusResponse),
        (status = 400, description = "Missing jobId", body = ErrorBody),
        (status = 500, description = "Lip-sync provider failed", body = ErrorBody)
    ),
    tag = "Lip-sync"
)]
pub async fn lipsync_status(
    State(state): State<AppState>,
    Query(query): Query<LipSyncStatusQuery>,
) -> impl IntoResponse {
    if let Err(e) = query.validate() {
        return AppError::from(e).into_response();
    }

    match LipSyncService::status(state, query.job_id.trim()).await {
        Ok(view) => ApiSuccess(view, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Lip-sync stored media and wait for the result
#[utoipa::path(
    post,
    path = "/api/v1/lipsync",
    request_body = LipSyncRequest,
    responses(
        (status = 200, description = "Finished video", body = LipSyncResponse),
        (status = 400, description = "Missing video, or neither script nor audio", body = ErrorBody),
        (status = 500, description = "Provider failure or timeout", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody)
    ),
    tag = "Lip-sync"
)]
pub async fn generate_lipsync(
    State(state): State<AppState>,
    Json(req): Json<LipSyncRequest>,
) -> impl IntoResponse {
    let (video_url, audio) = match parse_request(req) {
        Ok(parsed) => parsed,
        Err(e) => return e.into_response(),
    };

    let cancel = state.request_token();
    match LipSyncService::generate(state, &video_url, audio, &cancel).await {
        Ok(video_url) => ApiSuccess(LipSyncResponse { video_url }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Upload a video plus a script or audio file, lip-sync and wait for the result
#[utoipa::path(
    post,
    path = "/api/v1/lipsync/upload",
    request_body(content = LipSyncUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Finished video", body = LipSyncResponse),
        (status = 400, description = "Missing video, or neither script nor audio", body = ErrorBody),
        (status = 500, description = "Provider failure or timeout", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody)
    ),
    tag = "Lip-sync"
)]
pub async fn upload_lipsync(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let (video, audio) = match read_form(&mut multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let cancel = state.request_token();
    match LipSyncService::generate_from_upload(state, video, audio, &cancel).await {
        Ok(video_url) => ApiSuccess(LipSyncResponse { video_url }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Reads every part before anything is uploaded, so bad forms never reach a provider.
async fn read_form(multipart: &mut Multipart) -> AppResult<(UploadedFile, AudioSource)> {
    let mut video = None;
    let mut audio = None;
    let mut script = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" => video = Some(read_file_field(field, &[mime::VIDEO]).await?),
            "audio" => audio = Some(read_file_field(field, &[mime::AUDIO]).await?),
            "script" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Failed to read script: {}", e)))?;
                script = Some(text);
            }
            _ => {}
        }
    }

    let video = video.ok_or_else(|| AppError::validation("A video file is required"))?;
    let audio = AudioSource::pick(script, audio.map(AudioSource::File))?;
    Ok((video, audio))
}
