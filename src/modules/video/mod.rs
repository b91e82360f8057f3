use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/video/start", post(handler::start_video))
        .route("/video/status", get(handler::video_status))
        .route("/video/generate", post(handler::generate_video))
}
