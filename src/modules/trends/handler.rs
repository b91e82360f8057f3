use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use super::dto::{TrendSource, TrendsQuery, TrendsResponse};
use super::service::TrendService;
use crate::common::error::AppError;
use crate::common::response::{ApiSuccess, ErrorBody};
use crate::state::AppState;

/// Discover trending topics from Twitter or GPT
#[utoipa::path(
    get,
    path = "/api/v1/trends",
    params(TrendsQuery),
    responses(
        (status = 200, description = "Trends, in provider order", body = TrendsResponse),
        (status = 400, description = "Missing query or unknown source", body = ErrorBody),
        (status = 500, description = "Trend provider failed", body = ErrorBody)
    ),
    tag = "Content"
)]
pub async fn discover_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> impl IntoResponse {
    if let Err(e) = query.validate() {
        return AppError::from(e).into_response();
    }
    let source = match query.source.parse::<TrendSource>() {
        Ok(source) => source,
        Err(e) => return e.into_response(),
    };

    match TrendService::discover(state, &query.query, source).await {
        Ok(trends) => ApiSuccess(TrendsResponse { trends }, StatusCode::OK).into_response(),
        Err(e) => e.into_response(),
    }
}
