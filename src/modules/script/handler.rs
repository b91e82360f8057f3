use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use super::dto::{ScriptQuery, ScriptResponse};
use super::service::ScriptService;
use crate::common::error::AppError;
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::state::AppState;

/// Generate a short-form talking-head script
#[utoipa::path(
    get,
    path = "/api/v1/script",
    params(ScriptQuery),
    responses(
        (status = 200, description = "Generated script", body = ScriptResponse),
        (status = 400, description = "Missing topic", body = ErrorBody),
        (status = 500, description = "Text generation failed", body = ErrorBody)
    ),
    tag = "Content"
)]
pub async fn generate_script(
    State(state): State<AppState>,
    Query(query): Query<ScriptQuery>,
) -> impl IntoResponse {
    if let Err(e) = query.validate() {
        return AppError::from(e).into_response();
    }

    match ScriptService::generate(state, &query.topic).await {
        Ok(script) => ApiSuccess(ScriptResponse { script }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}
