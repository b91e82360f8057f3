use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppResult;
use crate::jobs::model::{GenerationJob, JobSnapshot, JobStatus};

/// Client-facing view of a single status check.
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    /// `PENDING` is reported as `PROCESSING`.
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobStatusResponse {
    pub fn from_snapshot(
        provider: &'static str,
        job_id: &str,
        snapshot: JobSnapshot,
    ) -> AppResult<Self> {
        let mut job = GenerationJob::new(provider, job_id)?;
        job.apply(snapshot)?;

        let status = match job.status() {
            JobStatus::Pending => JobStatus::Processing,
            other => other,
        };

        Ok(Self {
            status,
            video_url: job.result().map(str::to_string),
            error: job.error().map(str::to_string),
        })
    }
}
