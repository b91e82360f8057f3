use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::common::error::{AppError, AppResult};

/// Provider-reported status of a generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Processing => 1,
            JobStatus::Completed | JobStatus::Failed => 2,
        }
    }
}

/// One answer from a provider's status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn pending() -> Self {
        Self {
            status: JobStatus::Pending,
            result: None,
            error: None,
        }
    }

    pub fn processing() -> Self {
        Self {
            status: JobStatus::Processing,
            ..Self::pending()
        }
    }

    pub fn completed(result: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn failed(reason: Option<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            result: None,
            error: reason,
        }
    }
}

/// An in-flight provider job as seen by one orchestration.
///
/// Status only moves forward and the result is set exactly when the job completes.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    provider: &'static str,
    id: String,
    status: JobStatus,
    result: Option<String>,
    error: Option<String>,
}

impl GenerationJob {
    pub fn new(provider: &'static str, id: impl Into<String>) -> AppResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AppError::contract(provider, "empty job id"));
        }
        Ok(Self {
            provider,
            id,
            status: JobStatus::Pending,
            result: None,
            error: None,
        })
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Folds a status answer into the job.
    pub fn apply(&mut self, snapshot: JobSnapshot) -> AppResult<()> {
        if self.status.is_terminal() {
            return Ok(());
        }
        if snapshot.status.rank() < self.status.rank() {
            warn!(
                "{} job {} went from {:?} back to {:?}, ignoring",
                self.provider, self.id, self.status, snapshot.status
            );
            return Ok(());
        }

        match snapshot.status {
            JobStatus::Completed => {
                let result = snapshot
                    .result
                    .filter(|r| !r.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::contract(
                            self.provider,
                            format!("job {} completed without a result", self.id),
                        )
                    })?;
                self.result = Some(result);
            }
            JobStatus::Failed => self.error = snapshot.error,
            JobStatus::Pending | JobStatus::Processing => {}
        }
        self.status = snapshot.status;
        Ok(())
    }
}

/// Lifecycle of a job-based orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    NotStarted,
    Submitted,
    Polling,
    Completed,
    Failed,
    TimedOut,
    Cancelled,
}

impl JobPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobPhase::Completed | JobPhase::Failed | JobPhase::TimedOut | JobPhase::Cancelled
        )
    }

    pub fn can_transition_to(self, next: JobPhase) -> bool {
        use JobPhase::*;
        match (self, next) {
            (NotStarted, Submitted) => true,
            (Submitted, Polling) => true,
            (Polling, Polling) => true,
            (Polling, Completed | Failed | TimedOut) => true,
            (Submitted | Polling, Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobPhase::NotStarted => "NOT_STARTED",
            JobPhase::Submitted => "SUBMITTED",
            JobPhase::Polling => "POLLING",
            JobPhase::Completed => "COMPLETED",
            JobPhase::Failed => "FAILED",
            JobPhase::TimedOut => "TIMED_OUT",
            JobPhase::Cancelled => "CANCELLED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_is_set_only_on_completion() {
        let mut job = GenerationJob::new("sync", "abc").unwrap();
        job.apply(JobSnapshot::processing()).unwrap();
        assert_eq!(job.status(), JobStatus::Processing);
        assert!(job.result().is_none());

        job.apply(JobSnapshot::completed("out.mp4")).unwrap();
        assert_eq!(job.status(), JobStatus::Completed);
        assert_eq!(job.result(), Some("out.mp4"));
    }

    #[test]
    fn status_never_moves_backwards() {
        let mut job = GenerationJob::new("d-id", "tlk_1").unwrap();
        job.apply(JobSnapshot::processing()).unwrap();
        job.apply(JobSnapshot::pending()).unwrap();
        assert_eq!(job.status(), JobStatus::Processing);

        job.apply(JobSnapshot::failed(Some("bad face".into()))).unwrap();
        job.apply(JobSnapshot::completed("late.mp4")).unwrap();
        assert_eq!(job.status(), JobStatus::Failed);
        assert!(job.result().is_none());
        assert_eq!(job.error(), Some("bad face"));
    }

    #[test]
    fn completed_without_result_is_a_contract_violation() {
        let mut job = GenerationJob::new("sync", "abc").unwrap();
        let snapshot = JobSnapshot {
            status: JobStatus::Completed,
            result: None,
            error: None,
        };
        let err = job.apply(snapshot).unwrap_err();
        assert!(matches!(err, AppError::ProviderContractViolation { .. }));
        assert!(job.result().is_none());
    }

    #[test]
    fn empty_job_id_is_rejected() {
        assert!(GenerationJob::new("sync", "  ").is_err());
    }

    #[test]
    fn terminal_phases_have_no_exits() {
        use JobPhase::*;
        let all = [NotStarted, Submitted, Polling, Completed, Failed, TimedOut, Cancelled];
        for from in all.into_iter().filter(|p| p.is_terminal()) {
            assert!(all.iter().all(|to| !from.can_transition_to(*to)), "{from} has an exit");
        }
        assert!(NotStarted.can_transition_to(Submitted));
        assert!(!NotStarted.can_transition_to(Polling));
        assert!(Polling.can_transition_to(TimedOut));
    }

    #[test]
    fn status_serializes_in_upper_case() {
        assert_eq!(serde_json::to_string(&JobStatus::Processing).unwrap(), "\"PROCESSING\"");
    }
}
