use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::common::error::{AppError, AppResult};
use crate::jobs::model::{GenerationJob, JobPhase, JobSnapshot, JobStatus};

/// Status side of a job-based provider.
#[async_trait]
pub trait JobStatusSource: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn fetch_status(&self, job_id: &str) -> AppResult<JobSnapshot>;
}

/// How long and how often to ask a provider about a job.
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Delay before the second status check.
    pub interval: Duration,
    /// Upper bound on status checks, `None` for unbounded.
    pub max_attempts: Option<u32>,
    /// Wall-clock bound measured from the first check.
    pub deadline: Option<Duration>,
    /// Growth applied to the delay after every pending answer; 1.0 keeps it fixed.
    pub backoff_factor: f64,
    pub max_interval: Duration,
    /// Consecutive transient fetch failures tolerated before giving up.
    pub transient_retries: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: Some(100),
            deadline: Some(Duration::from_secs(600)),
            backoff_factor: 1.0,
            max_interval: Duration::from_secs(60),
            transient_retries: 0,
        }
    }
}

impl PollPolicy {
    pub fn fixed(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: Some(max_attempts),
            deadline: None,
            ..Self::default()
        }
    }

    fn next_delay(&self, current: Duration) -> Duration {
        if self.backoff_factor <= 1.0 {
            return current;
        }
        current.mul_f64(self.backoff_factor).min(self.max_interval.max(self.interval))
    }
}

#[derive(Debug, Clone)]
pub struct JobPoller {
    policy: PollPolicy,
}

impl JobPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Polls `source` until the job completes, fails, runs out of budget or is cancelled.
    ///
    /// Returns the job's result reference on completion.
    pub async fn wait(
        &self,
        source: &dyn JobStatusSource,
        job_id: &str,
        cancel: &CancellationToken,
    ) -> AppResult<String> {
        let provider = source.provider();
        let mut job = GenerationJob::new(provider, job_id)?;
        let mut phase = JobPhase::NotStarted;
        advance(&mut phase, JobPhase::Submitted, provider, job_id);
        advance(&mut phase, JobPhase::Polling, provider, job_id);

        let started = Instant::now();
        let mut delay = self.policy.interval;
        let mut attempts = 0u32;
        let mut transient_failures = 0u32;

        loop {
            attempts += 1;

            let fetched = tokio::select! {
                _ = cancel.cancelled() => {
                    advance(&mut phase, JobPhase::Cancelled, provider, job_id);
                    return Err(AppError::Cancelled);
                }
                res = source.fetch_status(job_id) => res,
            };

            match fetched {
                Ok(snapshot) => {
                    transient_failures = 0;
                    job.apply(snapshot)?;
                    match job.status() {
                        JobStatus::Completed => {
                            advance(&mut phase, JobPhase::Completed, provider, job_id);
                            info!(
                                "{} job {} completed after {} status checks",
                                provider, job_id, attempts
                            );
                            // apply() guarantees a result on completion
                            return job
                                .result()
                                .map(str::to_string)
                                .ok_or_else(|| AppError::contract(provider, "missing result"));
                        }
                        JobStatus::Failed => {
                            advance(&mut phase, JobPhase::Failed, provider, job_id);
                            return Err(AppError::ProviderJobFailed {
                                provider,
                                job_id: job_id.to_string(),
                                reason: job
                                    .error()
                                    .unwrap_or("provider reported failure")
                                    .to_string(),
                            });
                        }
                        status => {
                            debug!(
                                "{} job {} is {:?} (check {})",
                                provider, job_id, status, attempts
                            );
                        }
                    }
                }
                Err(e) if e.is_transient() && transient_failures < self.policy.transient_retries => {
                    transient_failures += 1;
                    warn!(
                        "Status check {} for {} job {} failed ({}/{} transient retries): {}",
                        attempts,
                        provider,
                        job_id,
                        transient_failures,
                        self.policy.transient_retries,
                        e
                    );
                }
                Err(e) => return Err(e),
            }

            let elapsed = started.elapsed();
            let out_of_attempts = self.policy.max_attempts.is_some_and(|max| attempts >= max);
            let past_deadline = self.policy.deadline.is_some_and(|d| elapsed >= d);
            if out_of_attempts || past_deadline {
                advance(&mut phase, JobPhase::TimedOut, provider, job_id);
                return Err(AppError::Timeout {
                    job_id: job_id.to_string(),
                    attempts,
                    elapsed,
                });
            }

            let wait = match self.policy.deadline {
                Some(deadline) => delay.min(deadline.saturating_sub(elapsed)),
                None => delay,
            };
            tokio::select! {
                _ = cancel.cancelled() => {
                    advance(&mut phase, JobPhase::Cancelled, provider, job_id);
                    return Err(AppError::Cancelled);
                }
                _ = tokio::time::sleep(wait) => {}
            }
            delay = self.policy.next_delay(delay);
            advance(&mut phase, JobPhase::Polling, provider, job_id);
        }
    }
}

fn advance(phase: &mut JobPhase, next: JobPhase, provider: &str, job_id: &str) {
    debug_assert!(
        phase.can_transition_to(next),
        "illegal job transition {} -> {}",
        phase,
        next
    );
    if *phase != next {
        debug!("{} job {}: {} -> {}", provider, job_id, phase, next);
    }
    *phase = next;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Replays canned answers, then keeps answering PROCESSING.
    pub(crate) struct ScriptedSource {
        answers: Mutex<VecDeque<AppResult<JobSnapshot>>>,
        pub calls: AtomicU32,
    }

    impl ScriptedSource {
        pub(crate) fn new(answers: Vec<AppResult<JobSnapshot>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                calls: AtomicU32::new(0),
            }
        }

        pub(crate) fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl JobStatusSource for ScriptedSource {
        fn provider(&self) -> &'static str {
            "stub"
        }

        async fn fetch_status(&self, _job_id: &str) -> AppResult<JobSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(JobSnapshot::processing()))
        }
    }

    fn processing_then(n: usize, last: JobSnapshot) -> Vec<AppResult<JobSnapshot>> {
        let mut answers: Vec<_> = (0..n).map(|_| Ok(JobSnapshot::processing())).collect();
        answers.push(Ok(last));
        answers
    }

    #[tokio::test(start_paused = true)]
    async fn completes_after_n_pending_checks() {
        let interval = Duration::from_secs(30);
        let poller = JobPoller::new(PollPolicy::fixed(interval, 100));
        let source = ScriptedSource::new(processing_then(3, JobSnapshot::completed("out.mp4")));

        let started = Instant::now();
        let url = poller
            .wait(&source, "job-1", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(url, "out.mp4");
        assert_eq!(source.calls(), 4);
        assert_eq!(started.elapsed(), interval * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_completion_does_not_sleep() {
        let poller = JobPoller::new(PollPolicy::fixed(Duration::from_secs(5), 10));
        let source = ScriptedSource::new(vec![Ok(JobSnapshot::completed("done.mp4"))]);

        let started = Instant::now();
        poller.wait(&source, "job", &CancellationToken::new()).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn provider_failure_is_terminal() {
        let poller = JobPoller::new(PollPolicy::fixed(Duration::from_secs(5), 10));
        let source = ScriptedSource::new(processing_then(
            1,
            JobSnapshot::failed(Some("face not found".into())),
        ));

        let err = poller
            .wait(&source, "job", &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            AppError::ProviderJobFailed { reason, job_id, .. } => {
                assert_eq!(reason, "face not found");
                assert_eq!(job_id, "job");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn never_finishing_job_times_out_at_attempt_bound() {
        let poller = JobPoller::new(PollPolicy::fixed(Duration::from_secs(5), 100));
        let source = ScriptedSource::new(vec![]);

        let err = poller
            .wait(&source, "stuck", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Timeout { attempts: 100, .. }));
        assert_eq!(source.calls(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn never_finishing_job_times_out_at_deadline() {
        let policy = PollPolicy {
            interval: Duration::from_secs(30),
            max_attempts: None,
            deadline: Some(Duration::from_secs(100)),
            ..PollPolicy::default()
        };
        let poller = JobPoller::new(policy);
        let source = ScriptedSource::new(vec![]);

        let started = Instant::now();
        let err = poller
            .wait(&source, "stuck", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Timeout { .. }));
        assert_eq!(started.elapsed(), Duration::from_secs(100));
        // checks at 0, 30, 60, 90 and a last one clamped to the deadline
        assert_eq!(source.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failure_surfaces_immediately_by_default() {
        let poller = JobPoller::new(PollPolicy::fixed(Duration::from_secs(5), 10));
        let source = ScriptedSource::new(vec![
            Ok(JobSnapshot::processing()),
            Err(AppError::unavailable("stub", "connection reset")),
            Ok(JobSnapshot::completed("never.mp4")),
        ]);

        let err = poller
            .wait(&source, "job", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ProviderUnavailable { .. }));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_are_retried_when_allowed() {
        let policy = PollPolicy {
            transient_retries: 2,
            ..PollPolicy::fixed(Duration::from_secs(5), 10)
        };
        let poller = JobPoller::new(policy);
        let source = ScriptedSource::new(vec![
            Err(AppError::unavailable("stub", "connection reset")),
            Err(AppError::Provider {
                provider: "stub",
                status: 503,
                message: "busy".into(),
            }),
            Ok(JobSnapshot::completed("out.mp4")),
        ]);

        let url = poller
            .wait(&source, "job", &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(url, "out.mp4");
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_errors_are_never_retried() {
        let policy = PollPolicy {
            transient_retries: 5,
            ..PollPolicy::fixed(Duration::from_secs(5), 10)
        };
        let poller = JobPoller::new(policy);
        let source = ScriptedSource::new(vec![Err(AppError::Provider {
            provider: "stub",
            status: 404,
            message: "no such job".into(),
        })]);

        let err = poller
            .wait(&source, "job", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Provider { status: 404, .. }));
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_grows_delay_up_to_cap() {
        let policy = PollPolicy {
            interval: Duration::from_secs(1),
            max_attempts: Some(10),
            deadline: None,
            backoff_factor: 2.0,
            max_interval: Duration::from_secs(4),
            transient_retries: 0,
        };
        let poller = JobPoller::new(policy);
        let source = ScriptedSource::new(processing_then(4, JobSnapshot::completed("x")));

        let started = Instant::now();
        poller.wait(&source, "job", &CancellationToken::new()).await.unwrap();

        // 1 + 2 + 4 + 4
        assert_eq!(started.elapsed(), Duration::from_secs(11));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_the_loop() {
        let poller = JobPoller::new(PollPolicy::fixed(Duration::from_secs(30), 100));
        let source = ScriptedSource::new(vec![]);
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(45)).await;
            trigger.cancel();
        });

        let err = poller.wait(&source, "job", &cancel).await.unwrap_err();

        assert!(matches!(err, AppError::Cancelled));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn empty_job_id_is_a_contract_violation() {
        let poller = JobPoller::new(PollPolicy::default());
        let source = ScriptedSource::new(vec![]);

        let err = poller
            .wait(&source, "", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ProviderContractViolation { .. }));
        assert_eq!(source.calls(), 0);
    }
}
