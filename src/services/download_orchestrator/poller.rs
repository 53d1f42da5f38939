use crate::services::download_orchestrator::traits::{DownloadService, ProgressSink};
use crate::services::download_orchestrator::types::{JobStatus, ProgressEvent};
use crate::types::JobId;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const GENERIC_JOB_FAILURE: &str = "Download failed";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PollOutcome {
    Completed,
    Failed(String),
    Cancelled,
}

/// Periodically queries the backend for job progress and forwards each
/// observation to the sink. Stops on its own once the job reaches a terminal
/// status, or when the owner cancels the token.
pub(crate) struct ProgressPoller {
    download_service: Arc<dyn DownloadService>,
    poll_interval: Duration,
    cancellation: CancellationToken,
}

impl ProgressPoller {
    pub(crate) fn new(download_service: Arc<dyn DownloadService>, poll_interval: Duration) -> Self {
        Self {
            download_service,
            poll_interval,
            cancellation: CancellationToken::new(),
        }
    }

    pub(crate) fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub(crate) async fn run(self, job_id: JobId, sink: Arc<dyn ProgressSink>) -> PollOutcome {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => {
                    debug!(%job_id, "Progress polling stopped");
                    return PollOutcome::Cancelled;
                }
                _ = ticker.tick() => {}
            }

            let snapshot = match self.download_service.fetch_progress(&job_id).await {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    warn!(%job_id, ?error, "Progress query failed, will retry on the next tick");
                    continue;
                }
            };

            match snapshot.status {
                JobStatus::Complete => {
                    sink.progress(ProgressEvent::completed()).await;
                    self.cancellation.cancel();
                    return PollOutcome::Completed;
                }
                JobStatus::Error => {
                    let message = snapshot
                        .message
                        .unwrap_or_else(|| GENERIC_JOB_FAILURE.to_string());
                    sink.failed(&message).await;
                    self.cancellation.cancel();
                    return PollOutcome::Failed(message);
                }
                _ => {
                    sink.progress(ProgressEvent::from_snapshot(&snapshot)).await;
                }
            }
        }
    }
}
