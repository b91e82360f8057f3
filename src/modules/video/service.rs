use tokio_util::sync::CancellationToken;
use tracing::info;

use super::dto::VideoRequest;
use crate::common::error::AppResult;
use crate::infrastructure::providers::did::PROVIDER;
use crate::jobs::poller::JobStatusSource;
use crate::jobs::status::JobStatusResponse;
use crate::state::AppState;

pub struct VideoService;

impl VideoService {
    /// Submits a talking-head job and returns the talk id.
    pub async fn start(state: AppState, req: &VideoRequest) -> AppResult<String> {
        state
            .providers
            .did
            .submit(req.script.trim(), req.source_url.trim())
            .await
    }

    pub async fn status(state: AppState, talk_id: &str) -> AppResult<JobStatusResponse> {
        let snapshot = state.providers.did.fetch_status(talk_id).await?;
        JobStatusResponse::from_snapshot(PROVIDER, talk_id, snapshot)
    }

    /// Submits and waits for the finished video.
    pub async fn generate(
        state: AppState,
        req: &VideoRequest,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        let talk_id = Self::start(state.clone(), req).await?;
        let video_url = state
            .poller
            .wait(&state.providers.did, &talk_id, cancel)
            .await?;

        info!("Talking-head video ready: {}", video_url);
        Ok(video_url)
    }
}
