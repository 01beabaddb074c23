//! Translation job polling
//!
//! Submits a translation job, polls it until it leaves `ACTIVE` or the
//! attempt ceiling is reached, then downloads every result.

use crate::adapters::onshape::{OnshapeClient, TranslationRequest};
use crate::config::PollingConfig;
use crate::domain::{ApiError, Artifact, ExportFormat, ExporterError, Result, TranslationJob};
use crate::log_poll_attempt;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Delay between poll attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Drives one translation job per call
pub struct JobPoller {
    client: OnshapeClient,
    sleeper: Arc<dyn Sleeper>,
    max_attempts: u32,
    interval: Duration,
}

impl JobPoller {
    /// Creates a poller with the configured attempt ceiling and interval
    pub fn new(client: OnshapeClient, sleeper: Arc<dyn Sleeper>, polling: &PollingConfig) -> Self {
        Self {
            client,
            sleeper,
            max_attempts: polling.max_attempts,
            interval: Duration::from_millis(polling.interval_ms),
        }
    }

    /// Runs a translation to completion and downloads its results
    ///
    /// A non-success status while creating or polling the job is returned
    /// immediately. Downloads that fail are logged and skipped, so the
    /// returned list can be shorter than the job's result list.
    ///
    /// # Errors
    ///
    /// [`TranslationError`](crate::domain::TranslationError) when the job
    /// fails, times out or finishes without results.
    pub async fn export(
        &self,
        request: &TranslationRequest,
        base_name: &str,
        format: &ExportFormat,
    ) -> Result<Vec<Artifact>> {
        let job = self.run_job(request).await?;
        let result_ids = job.outcome()?;

        let job_size = result_ids.len();
        let mut artifacts = Vec::with_capacity(job_size);
        for (index, result_id) in result_ids.iter().enumerate() {
            match self.client.download_external_data(result_id).await {
                Ok(bytes) => {
                    tracing::debug!(
                        job_id = %job.id,
                        result_id = %result_id,
                        bytes = bytes.len(),
                        "Downloaded translation result"
                    );
                    artifacts.push(Artifact::new(bytes, base_name, format, index, job_size));
                }
                Err(e) => {
                    tracing::warn!(
                        job_id = %job.id,
                        result_id = %result_id,
                        status = ?e.status(),
                        error = %e,
                        "Failed to download result, skipping"
                    );
                }
            }
        }

        Ok(artifacts)
    }

    /// Creates the job and polls it into a terminal state
    pub async fn run_job(&self, request: &TranslationRequest) -> Result<TranslationJob> {
        let created = self.client.create_translation(request).await?;
        let id = created.id.clone().ok_or_else(|| {
            ExporterError::Api(ApiError::InvalidResponse(
                "Translation response has no job id".to_string(),
            ))
        })?;

        tracing::info!(
            job_id = %id,
            format = %request.format_name,
            state = %created.request_state,
            "Translation job created"
        );

        let mut job = TranslationJob::new(id);
        job.observe(
            &created.request_state,
            created.result_external_data_ids,
            created.failure_reason,
        )?;

        while !job.is_terminal() && job.polls < self.max_attempts {
            self.sleeper.sleep(self.interval).await;
            job.polls += 1;

            let status = self.client.get_translation(&job.id).await?;
            log_poll_attempt!(job.id, job.polls, self.max_attempts, status.request_state);
            job.observe(
                &status.request_state,
                status.result_external_data_ids,
                status.failure_reason,
            )?;
        }

        if !job.is_terminal() {
            tracing::warn!(
                job_id = %job.id,
                attempts = job.polls,
                "Translation still active after the last poll"
            );
            job.time_out();
        }

        tracing::debug!(job_id = %job.id, state = %job.state, polls = job.polls, "Translation job finished");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::onshape::testing::ScriptedTransport;
    use crate::adapters::onshape::ApiResponse;
    use crate::domain::{ApiError, DocumentReference, JobState, TranslationError};
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingSleeper {
        calls: AtomicU32,
    }

    #[async_trait]
    impl Sleeper for CountingSleeper {
        async fn sleep(&self, _duration: Duration) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn poller(
        transport: &Arc<ScriptedTransport>,
        sleeper: &Arc<CountingSleeper>,
        max_attempts: u32,
    ) -> JobPoller {
        let reference =
            DocumentReference::from_url("https://cad.onshape.com/documents/D/w/W/e/E").unwrap();
        let client = OnshapeClient::new(transport.clone(), reference);
        let polling = PollingConfig {
            max_attempts,
            interval_ms: 2000,
        };
        JobPoller::new(client, sleeper.clone(), &polling)
    }

    fn status(body: serde_json::Value) -> ApiResponse {
        ApiResponse::json_body(&body)
    }

    fn step() -> ExportFormat {
        ExportFormat::new("STEP").unwrap()
    }

    #[tokio::test]
    async fn test_times_out_after_exact_attempt_ceiling() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/translations", status(json!({"id": "T1", "requestState": "ACTIVE"})));
        transport.respond("/translations/T1", status(json!({"requestState": "ACTIVE"})));
        let sleeper = Arc::new(CountingSleeper::default());

        let err = poller(&transport, &sleeper, 5)
            .export(&TranslationRequest::new("STEP"), "part", &step())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExporterError::Translation(TranslationError::TimedOut { attempts: 5 })
        ));
        assert_eq!(transport.count("/translations/T1"), 5);
        assert_eq!(sleeper.calls.load(Ordering::SeqCst), 5);
        assert!(transport
            .requests()
            .iter()
            .all(|r| !r.url.contains("/externaldata/")));
    }

    #[tokio::test]
    async fn test_done_downloads_every_result() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/translations", status(json!({"id": "T1", "requestState": "ACTIVE"})));
        transport.respond("/translations/T1", status(json!({"requestState": "ACTIVE"})));
        transport.respond(
            "/translations/T1",
            status(json!({"requestState": "DONE", "resultExternalDataIds": ["a", "b", "c"]})),
        );
        transport.respond("/externaldata/a", ApiResponse::new(200, "A"));
        transport.respond("/externaldata/b", ApiResponse::new(200, "B"));
        transport.respond("/externaldata/c", ApiResponse::new(200, "C"));
        let sleeper = Arc::new(CountingSleeper::default());

        let artifacts = poller(&transport, &sleeper, 30)
            .export(&TranslationRequest::new("STEP"), "bracket", &step())
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 3);
        assert_eq!(artifacts[1].bytes, b"B");
        assert_eq!(artifacts[1].index_within_job, 1);
        assert!(artifacts.iter().all(|a| a.job_size == 3));
        assert!(artifacts.iter().all(|a| a.format_extension == "step"));
        assert_eq!(transport.count("/translations/T1"), 2);
        let downloads = transport
            .requests()
            .iter()
            .filter(|r| r.url.contains("/externaldata/"))
            .count();
        assert_eq!(downloads, 3);
    }

    #[tokio::test]
    async fn test_failed_download_is_skipped() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/translations",
            status(json!({"id": "T1", "requestState": "DONE", "resultExternalDataIds": ["a", "b"]})),
        );
        transport.respond("/externaldata/a", ApiResponse::new(500, "boom"));
        transport.respond("/externaldata/b", ApiResponse::new(200, "B"));
        let sleeper = Arc::new(CountingSleeper::default());

        let artifacts = poller(&transport, &sleeper, 30)
            .export(&TranslationRequest::new("STEP"), "part", &step())
            .await
            .unwrap();

        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].index_within_job, 1);
        assert_eq!(artifacts[0].job_size, 2);
        // Already terminal at creation, so no poll and no sleep
        assert_eq!(sleeper.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_job_surfaces_reason() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/translations", status(json!({"id": "T1", "requestState": "ACTIVE"})));
        transport.respond(
            "/translations/T1",
            status(json!({"requestState": "FAILED", "failureReason": "Unsupported geometry"})),
        );
        let sleeper = Arc::new(CountingSleeper::default());

        let err = poller(&transport, &sleeper, 30)
            .export(&TranslationRequest::new("IGES"), "part", &step())
            .await
            .unwrap_err();

        match err {
            ExporterError::Translation(TranslationError::Failed { reason }) => {
                assert_eq!(reason, "Unsupported geometry")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(transport.count("/translations/T1"), 1);
    }

    #[tokio::test]
    async fn test_done_without_results() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/translations", status(json!({"id": "T1", "requestState": "ACTIVE"})));
        transport.respond(
            "/translations/T1",
            status(json!({"requestState": "DONE", "resultExternalDataIds": []})),
        );
        let sleeper = Arc::new(CountingSleeper::default());

        let err = poller(&transport, &sleeper, 30)
            .export(&TranslationRequest::new("STEP"), "part", &step())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExporterError::Translation(TranslationError::NoResults)
        ));
    }

    #[tokio::test]
    async fn test_poll_error_is_hard_stop() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/translations", status(json!({"id": "T1", "requestState": "ACTIVE"})));
        transport.respond("/translations/T1", ApiResponse::new(500, "internal"));
        let sleeper = Arc::new(CountingSleeper::default());

        let err = poller(&transport, &sleeper, 30)
            .export(&TranslationRequest::new("STEP"), "part", &step())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert_eq!(transport.count("/translations/T1"), 1);
    }

    #[tokio::test]
    async fn test_poll_connection_failure_is_hard_stop() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/translations", status(json!({"id": "T1", "requestState": "ACTIVE"})));
        transport.respond("/translations/T1", status(json!({"requestState": "ACTIVE"})));
        transport.fail("/translations/T1", "connection reset by peer");
        transport.respond("/translations/T1", status(json!({"requestState": "ACTIVE"})));
        let sleeper = Arc::new(CountingSleeper::default());

        let err = poller(&transport, &sleeper, 30)
            .export(&TranslationRequest::new("STEP"), "part", &step())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExporterError::Api(ApiError::ConnectionFailed(ref message)) if message.contains("reset")
        ));
        assert_eq!(err.status(), None);
        assert_eq!(transport.count("/translations/T1"), 2);
        assert_eq!(sleeper.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_download_connection_failure_skips_only_that_result() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(
            "/translations",
            status(json!({
                "id": "T1",
                "requestState": "DONE",
                "resultExternalDataIds": ["a", "b", "c"]
            })),
        );
        transport.respond("/externaldata/a", ApiResponse::new(200, "A"));
        transport.fail("/externaldata/b", "connection timed out");
        transport.respond("/externaldata/c", ApiResponse::new(200, "C"));
        let sleeper = Arc::new(CountingSleeper::default());

        let artifacts = poller(&transport, &sleeper, 30)
            .export(&TranslationRequest::new("STEP"), "part", &step())
            .await
            .unwrap();

        let kept: Vec<(usize, &[u8])> = artifacts
            .iter()
            .map(|a| (a.index_within_job, a.bytes.as_slice()))
            .collect();
        assert_eq!(kept, vec![(0, b"A".as_slice()), (2, b"C".as_slice())]);
        assert!(artifacts.iter().all(|a| a.job_size == 3));
        assert_eq!(transport.count("/externaldata/c"), 1);
    }

    #[tokio::test]
    async fn test_run_job_reports_terminal_state() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/translations", status(json!({"id": "T1", "requestState": "ACTIVE"})));
        transport.respond(
            "/translations/T1",
            status(json!({"requestState": "DONE", "resultExternalDataIds": ["x"]})),
        );
        let sleeper = Arc::new(CountingSleeper::default());

        let job = poller(&transport, &sleeper, 30)
            .run_job(&TranslationRequest::new("STEP"))
            .await
            .unwrap();

        assert_eq!(job.state, JobState::Done);
        assert_eq!(job.polls, 1);
        assert_eq!(job.result_artifact_ids, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_creation_without_id_is_invalid() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond("/translations", status(json!({"requestState": "ACTIVE"})));
        let sleeper = Arc::new(CountingSleeper::default());

        let err = poller(&transport, &sleeper, 30)
            .run_job(&TranslationRequest::new("STEP"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ExporterError::Api(ApiError::InvalidResponse(_))
        ));
    }
}
