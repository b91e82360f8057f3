use axum::Router;
use axum::routing::post;

use crate::state::AppState;

pub mod dto;
pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/influencer/profile", post(handler::create_profile))
        .route("/influencer/posts", post(handler::create_posts))
        .route("/influencer/image", post(handler::create_image))
}
