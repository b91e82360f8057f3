//! D-ID talking-head video synthesis.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{job_url, join_url, read_json, transport_error};
use crate::common::error::{AppError, AppResult};
use crate::config::settings::DidSettings;
use crate::jobs::model::{JobSnapshot, JobStatus};
use crate::jobs::poller::JobStatusSource;

pub const PROVIDER: &str = "d-id";

#[derive(Debug, Serialize)]
struct CreateTalkRequest<'a> {
    source_url: &'a str,
    script: TalkScript<'a>,
}

#[derive(Debug, Serialize)]
struct TalkScript<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    subtitles: &'static str,
    provider: VoiceProvider<'a>,
    input: &'a str,
    ssml: &'static str,
}

#[derive(Debug, Serialize)]
struct VoiceProvider<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    voice_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateTalkResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TalkStatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    result_url: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct TalkingHeadClient {
    http: Client,
    api_key: String,
    base_url: String,
    voice_id: String,
}

impl TalkingHeadClient {
    pub fn new(http: Client, settings: &DidSettings) -> Self {
        Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            voice_id: settings.voice_id.clone(),
        }
    }

    /// Starts a talk that reads `script` over the face in `source_url`; returns the talk id.
    pub async fn submit(&self, script: &str, source_url: &str) -> AppResult<String> {
        let request = CreateTalkRequest {
            source_url,
            script: TalkScript {
                kind: "text",
                subtitles: "false",
                provider: VoiceProvider {
                    kind: "microsoft",
                    voice_id: &self.voice_id,
                },
                input: script,
                ssml: "false",
            },
        };

        let response = self
            .http
            .post(join_url(&self.base_url, "/talks"))
            .header("Authorization", format!("Basic {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(transport_error(PROVIDER))?;

        let parsed: CreateTalkResponse = read_json(PROVIDER, response).await?;
        let talk_id = parsed
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::contract(PROVIDER, "talk created without an id"))?;

        info!("Talk job started: {}", talk_id);
        Ok(talk_id)
    }
}

fn map_status(raw: &str) -> JobStatus {
    match raw {
        "done" => JobStatus::Completed,
        "error" | "rejected" | "failed" => JobStatus::Failed,
        "created" => JobStatus::Pending,
        _ => JobStatus::Processing,
    }
}

#[async_trait]
impl JobStatusSource for TalkingHeadClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_status(&self, job_id: &str) -> AppResult<JobSnapshot> {
        let url = job_url(PROVIDER, &self.base_url, &["talks"], job_id)?;
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Basic {}", self.api_key))
            .send()
            .await
            .map_err(transport_error(PROVIDER))?;

        let parsed: TalkStatusResponse = read_json(PROVIDER, response).await?;
        let raw = parsed
            .status
            .ok_or_else(|| AppError::contract(PROVIDER, "talk status missing"))?;

        Ok(JobSnapshot {
            status: map_status(&raw),
            result: parsed.result_url,
            error: parsed.error.map(|e| match e {
                serde_json::Value::String(s) => s,
                other => other
                    .pointer("/description")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
                    .unwrap_or_else(|| other.to_string()),
            }),
        })
    }
}
