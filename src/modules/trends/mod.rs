use axum::Router;
use axum::routing::get;

use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new().route("/trends", get(handler::discover_trends))
}
