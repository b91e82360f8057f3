use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::common::error::{AppError, AppResult};
use crate::config::settings::AppConfig;

pub mod did;
pub mod lipsync;
pub mod openai;
pub mod tts;
pub mod twitter;

use did::TalkingHeadClient;
use lipsync::LipSyncClient;
use openai::OpenAiClient;
use tts::{GoogleCredentials, TtsClient};
use twitter::TwitterClient;

/// Longest upstream error body echoed back in a `ProviderError`.
const MAX_ERROR_BODY: usize = 500;

/// Every external generation service the orchestrators talk to.
#[derive(Clone)]
pub struct Providers {
    pub openai: OpenAiClient,
    pub tts: TtsClient,
    pub did: TalkingHeadClient,
    pub lipsync: LipSyncClient,
    pub twitter: TwitterClient,
}

impl Providers {
    pub fn from_config(config: &AppConfig, credentials: GoogleCredentials) -> reqwest::Result<Self> {
        let http = build_http_client(config.http_timeout)?;

        Ok(Self {
            openai: OpenAiClient::new(http.clone(), &config.openai),
            tts: TtsClient::new(http.clone(), &config.tts, credentials),
            did: TalkingHeadClient::new(http.clone(), &config.did),
            lipsync: LipSyncClient::new(http.clone(), &config.lipsync),
            twitter: TwitterClient::new(http, &config.twitter),
        })
    }
}

pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .user_agent(concat!("influencer-gpt/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// `{base}/{prefix}/{job_id}` with the id percent-encoded as a single path segment.
pub(crate) fn job_url(
    provider: &'static str,
    base: &str,
    prefix: &[&str],
    job_id: &str,
) -> AppResult<Url> {
    // dot segments are dropped by the url encoder, so they would address the parent resource
    if matches!(job_id, "" | "." | "..") {
        return Err(AppError::validation(format!("Invalid job id '{}'", job_id)));
    }

    let mut url = Url::parse(base).map_err(|e| AppError::unavailable(provider, e))?;
    url.path_segments_mut()
        .map_err(|_| AppError::unavailable(provider, "base URL cannot carry a path"))?
        .pop_if_empty()
        .extend(prefix)
        .push(job_id);
    Ok(url)
}

/// Passes successful responses through and turns everything else into `AppError::Provider`.
pub(crate) async fn ensure_success(provider: &'static str, response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::Provider {
        provider,
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Reads a successful response body as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: Response,
) -> AppResult<T> {
    let response = ensure_success(provider, response).await?;
    let body = response
        .text()
        .await
        .map_err(|e| AppError::unavailable(provider, e))?;

    serde_json::from_str(&body)
        .map_err(|e| AppError::contract(provider, format!("malformed response: {}", e)))
}

pub(crate) fn transport_error(provider: &'static str) -> impl Fn(reqwest::Error) -> AppError {
    move |e| AppError::unavailable(provider, e)
}

/// Pulls a human readable message out of the usual error envelopes.
fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        let candidates = [
            json.pointer("/error/message"),
            json.pointer("/error"),
            json.pointer("/message"),
            json.pointer("/description"),
            json.pointer("/detail"),
            json.pointer("/title"),
        ];
        if let Some(msg) = candidates.into_iter().flatten().find_map(Value::as_str) {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY).collect()
}
