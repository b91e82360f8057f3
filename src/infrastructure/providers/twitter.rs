//! Twitter recent search.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{join_url, read_json, transport_error};
use crate::common::error::{AppError, AppResult};
use crate::config::settings::TwitterSettings;

pub const PROVIDER: &str = "twitter";

const MAX_RESULTS: &str = "10";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<Tweet>>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text: String,
}

#[derive(Clone)]
pub struct TwitterClient {
    http: Client,
    bearer_token: Option<String>,
    base_url: String,
}

impl TwitterClient {
    pub fn new(http: Client, settings: &TwitterSettings) -> Self {
        Self {
            http,
            bearer_token: settings.bearer_token.clone(),
            base_url: settings.base_url.clone(),
        }
    }

    /// Texts of the most recent posts matching `query`, newest first.
    pub async fn search_recent(&self, query: &str) -> AppResult<Vec<String>> {
        let token = self
            .bearer_token
            .as_deref()
            .ok_or_else(|| AppError::unavailable(PROVIDER, "TWITTER_BEARER_TOKEN is not configured"))?;

        let response = self
            .http
            .get(join_url(&self.base_url, "/2/tweets/search/recent"))
            .bearer_auth(token)
            .query(&[("query", query), ("max_results", MAX_RESULTS)])
            .send()
            .await
            .map_err(transport_error(PROVIDER))?;

        let parsed: SearchResponse = read_json(PROVIDER, response).await?;
        let texts: Vec<String> = parsed
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.text)
            .collect();

        debug!("Twitter returned {} posts for {:?}", texts.len(), query);
        Ok(texts)
    }
}
