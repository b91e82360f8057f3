use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use super::dto::{
    ImageRequest, ImageResponse, ImageStyle, PostsRequest, PostsResponse, ProfileRequest,
    ProfileResponse,
};
use super::service::InfluencerService;
use crate::common::error::AppError;
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::state::AppState;

/// Generate a virtual influencer profile
#[utoipa::path(
    post,
    path = "/api/v1/influencer/profile",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Generated profile", body = ProfileResponse),
        (status = 400, description = "Missing field", body = ErrorBody),
        (status = 500, description = "Text generation failed", body = ErrorBody)
    ),
    tag = "Influencer"
)]
pub async fn create_profile(
    State(state): State<AppState>,
    Json(req): Json<ProfileRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return AppError::from(e).into_response();
    }

    match InfluencerService::profile(state, &req.name, &req.personality, &req.interests).await {
        Ok(profile) => ApiSuccess(ProfileResponse { profile }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Generate social media posts for a virtual influencer
#[utoipa::path(
    post,
    path = "/api/v1/influencer/posts",
    request_body = PostsRequest,
    responses(
        (status = 200, description = "Posts in request order", body = PostsResponse),
        (status = 400, description = "numPosts outside 1..=10", body = ErrorBody),
        (status = 500, description = "Text generation failed", body = ErrorBody)
    ),
    tag = "Influencer"
)]
pub async fn create_posts(
    State(state): State<AppState>,
    Json(req): Json<PostsRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return AppError::from(e).into_response();
    }

    let count = req.num_posts as usize;
    match InfluencerService::posts(state, count, req.topic()).await {
        Ok(posts) => ApiSuccess(PostsResponse { posts }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Generate a virtual influencer image
#[utoipa::path(
    post,
    path = "/api/v1/influencer/image",
    request_body = ImageRequest,
    responses(
        (status = 200, description = "Generated image URL", body = ImageResponse),
        (status = 400, description = "Missing description or unknown style", body = ErrorBody),
        (status = 500, description = "Image generation failed", body = ErrorBody)
    ),
    tag = "Influencer"
)]
pub async fn create_image(
    State(state): State<AppState>,
    Json(req): Json<ImageRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return AppError::from(e).into_response();
    }
    let style = match req.style.parse::<ImageStyle>() {
        Ok(style) => style,
        Err(e) => return e.into_response(),
    };

    match InfluencerService::image(state, &req.description, style).await {
        Ok(image_url) => ApiSuccess(ImageResponse { image_url }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}
