use axum::Router;
use axum::routing::{get, post};

use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lipsync", post(handler::generate_lipsync))
        .route("/lipsync/start", post(handler::start_lipsync))
        .route("/lipsync/status", get(handler::lipsync_status))
        .route("/lipsync/upload", post(handler::upload_lipsync))
}
