//! sync.so lip-sync generation.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{job_url, join_url, read_json, transport_error};
use crate::common::error::{AppError, AppResult};
use crate::config::settings::LipSyncSettings;
use crate::jobs::model::{JobSnapshot, JobStatus};
use crate::jobs::poller::JobStatusSource;

pub const PROVIDER: &str = "sync";

const OUTPUT_FPS: u32 = 25;
const OUTPUT_RESOLUTION: [u32; 2] = [1280, 720];

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    input: [MediaInput<'a>; 2],
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct MediaInput<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    output_format: &'static str,
    fps: u32,
    output_resolution: [u32; 2],
    active_speaker: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerationStatusResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    output_url: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Clone)]
pub struct LipSyncClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LipSyncClient {
    pub fn new(http: Client, settings: &LipSyncSettings) -> Self {
        Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
        }
    }

    /// Submits a lip-sync job pairing `video_url` with `audio_url`; returns the job id.
    pub async fn submit(&self, video_url: &str, audio_url: &str) -> AppResult<String> {
        let request = GenerateRequest {
            model: &self.model,
            input: [
                MediaInput {
                    kind: "video",
                    url: video_url,
                },
                MediaInput {
                    kind: "audio",
                    url: audio_url,
                },
            ],
            options: GenerateOptions {
                output_format: "mp4",
                fps: OUTPUT_FPS,
                output_resolution: OUTPUT_RESOLUTION,
                active_speaker: true,
            },
        };

        let response = self
            .http
            .post(join_url(&self.base_url, "/v2/generate"))
            .header("x-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error(PROVIDER))?;

        let parsed: GenerateResponse = read_json(PROVIDER, response).await?;
        let job_id = parsed
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::contract(PROVIDER, "generation created without an id"))?;

        info!("Lip-sync job started: {}", job_id);
        Ok(job_id)
    }
}

fn map_status(raw: &str) -> JobStatus {
    match raw.to_ascii_uppercase().as_str() {
        "COMPLETED" => JobStatus::Completed,
        "FAILED" | "REJECTED" | "CANCELED" | "CANCELLED" => JobStatus::Failed,
        "PENDING" => JobStatus::Pending,
        _ => JobStatus::Processing,
    }
}

#[async_trait]
impl JobStatusSource for LipSyncClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_status(&self, job_id: &str) -> AppResult<JobSnapshot> {
        let url = job_url(PROVIDER, &self.base_url, &["v2", "generate"], job_id)?;
        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(transport_error(PROVIDER))?;

        let parsed: GenerationStatusResponse = read_json(PROVIDER, response).await?;
        let raw = parsed
            .status
            .ok_or_else(|| AppError::contract(PROVIDER, "generation status missing"))?;

        Ok(JobSnapshot {
            status: map_status(&raw),
            result: parsed.output_url,
            error: parsed.error,
        })
    }
}
