use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use super::dto::{StartVideoResponse, VideoRequest, VideoResponse, VideoStatusQuery};
use super::service::VideoService;
use crate::common::error::AppError;
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::jobs::status::JobStatusResponse;
use crate::state::AppState;

/// Start a talking-head video job
#[utoipa::path(
    post,
    path = "/api/v1/video/start",
    request_body = VideoRequest,
    responses(
        (status = 200, description = "Job submitted", body = StartVideoResponse),
        (status = 400, description = "Missing script or invalid sourceUrl", body = ErrorBody),
        (status = 500, description = "Video provider failed", body = ErrorBody)
    ),
    tag = "Video"
)]
pub async fn start_video(
    State(state): State<AppState>,
    Json(req): Json<VideoRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return AppError::from(e).into_response();
    }

    match VideoService::start(state, &req).await {
        Ok(talk_id) => ApiSuccess(StartVideoResponse { talk_id }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Check a talking-head video job
#[utoipa::path(
    get,
    path = "/api/v1/video/status",
    params(VideoStatusQuery),
    responses(
        (status = 200, description = "Current job status", body = JobStatusResponse),
        (status = 400, description = "Missing talkId", body = ErrorBody),
        (status = 500, description = "Video provider failed", body = ErrorBody)
    ),
    tag = "Video"
)]
pub async fn video_status(
    State(state): State<AppState>,
    Query(query): Query<VideoStatusQuery>,
) -> impl IntoResponse {
    if let Err(e) = query.validate() {
        return AppError::from(e).into_response();
    }

    match VideoService::status(state, query.talk_id.trim()).await {
        Ok(view) => ApiSuccess(view, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Generate a talking-head video and wait for it
#[utoipa::path(
    post,
    path = "/api/v1/video/generate",
    request_body = VideoRequest,
    responses(
        (status = 200, description = "Finished video", body = VideoResponse),
        (status = 400, description = "Missing script or invalid sourceUrl", body = ErrorBody),
        (status = 500, description = "Provider failure or timeout", body = ErrorBody),
        (status = 503, description = "Server shutting down", body = ErrorBody)
    ),
    tag = "Video"
)]
pub async fn generate_video(
    State(state): State<AppState>,
    Json(req): Json<VideoRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return AppError::from(e).into_response();
    }

    let cancel = state.request_token();
    match VideoService::generate(state, &req, &cancel).await {
        Ok(video_url) => ApiSuccess(VideoResponse { video_url }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}
