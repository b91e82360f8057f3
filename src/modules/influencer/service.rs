use futures_util::{StreamExt, TryStreamExt, stream};
use tracing::info;

use super::dto::ImageStyle;
use crate::common::error::AppResult;
use crate::infrastructure::providers::openai::ChatPrompt;
use crate::state::AppState;

pub struct InfluencerService;

impl InfluencerService {
    pub async fn profile(
        state: AppState,
        name: &str,
        personality: &str,
        interests: &str,
    ) -> AppResult<String> {
        let prompt = ChatPrompt::user(format!(
            "Create a virtual influencer profile with the name '{}', personality '{}', and interests '{}'.",
            name.trim(),
            personality.trim(),
            interests.trim()
        ));

        let profile = state.providers.openai.complete(&prompt).await?;
        info!("Generated profile for {}", name.trim());
        Ok(profile)
    }

    /// Generates `count` posts concurrently; results keep request order.
    pub async fn posts(state: AppState, count: usize, topic: &str) -> AppResult<Vec<String>> {
        let prompt = ChatPrompt::user(format!(
            "Write a fun and engaging Instagram post for a virtual influencer promoting {}.",
            topic
        ));
        let prompt = &prompt;
        let openai = &state.providers.openai;

        let posts = run_ordered(count, state.config.posts_concurrency, move |_| {
            openai.complete(prompt)
        })
        .await?;

        info!("Generated {} posts about {:?}", posts.len(), topic);
        Ok(posts)
    }

    pub async fn image(state: AppState, description: &str, style: ImageStyle) -> AppResult<String> {
        let prompt = style.prompt(description.trim());
        state.providers.openai.generate_image(&prompt).await
    }
}

/// Runs `count` jobs with at most `limit` in flight; output follows job order.
async fn run_ordered<T, F, Fut>(count: usize, limit: usize, job: F) -> AppResult<Vec<T>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    stream::iter(0..count)
        .map(job)
        .buffered(limit.max(1))
        .try_collect()
        .await
}
