use crate::services::download_orchestrator::poller::{PollOutcome, ProgressPoller};
use crate::services::download_orchestrator::traits::{
    DownloadService, DownloadServiceError, MediaResolver, MediaResolverError, ProgressSink,
};
use crate::services::download_orchestrator::types::{DownloadSession, ProgressEvent};
use crate::types::{ArtifactUrl, FlowId, FormatId, MediaKind};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub(crate) enum DownloadFlowError {
    #[error("Please enter a valid http(s) URL")]
    InvalidUrl,
    #[error("The requested format is not available for this media")]
    UnknownFormat,
    #[error(transparent)]
    ResolverError(#[from] MediaResolverError),
    #[error(transparent)]
    StartError(DownloadServiceError),
    #[error(transparent)]
    TransferError(DownloadServiceError),
}

/// Drives one download from URL to served file: resolve, start the backend
/// job, watch its progress, and transfer the result. Collaborators are
/// injected behind trait objects so the whole flow is testable without a
/// running backend.
pub(crate) struct DownloadOrchestrator {
    resolver: Arc<dyn MediaResolver>,
    download_service: Arc<dyn DownloadService>,
    progress_sink: Arc<dyn ProgressSink>,
    poll_interval: Duration,
}

impl DownloadOrchestrator {
    pub(crate) fn new(
        resolver: Arc<dyn MediaResolver>,
        download_service: Arc<dyn DownloadService>,
        progress_sink: Arc<dyn ProgressSink>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            resolver,
            download_service,
            progress_sink,
            poll_interval,
        }
    }

    /// Validates the URL and asks the backend what the media offers. No
    /// network request is made for a URL that fails validation.
    pub(crate) async fn resolve(&self, raw_url: &str) -> Result<DownloadSession, DownloadFlowError> {
        let url = validate_url(raw_url)?;

        debug!(url = url.as_str(), "Resolving media information");

        let media_info = self.resolver.resolve(url.as_str()).await?;

        info!(
            url = url.as_str(),
            title = media_info.title.as_str(),
            "Resolved media information"
        );

        Ok(DownloadSession::new(url, media_info))
    }

    pub(crate) async fn download(
        &self,
        session: &DownloadSession,
        requested_format: Option<&FormatId>,
        kind: MediaKind,
    ) -> Result<ArtifactUrl, DownloadFlowError> {
        let flow_id: FlowId = Uuid::new_v4().into();

        let format_id = session
            .select_format(requested_format, kind)
            .ok_or(DownloadFlowError::UnknownFormat)?;

        let job_id = self
            .download_service
            .start(session.url(), &format_id, kind)
            .await
            .map_err(DownloadFlowError::StartError)?;

        info!(%flow_id, %job_id, %format_id, %kind, "Download job started");

        let poller = ProgressPoller::new(Arc::clone(&self.download_service), self.poll_interval);
        let stop_polling = poller.cancellation_token();
        let poll_task = actix_rt::spawn(poller.run(job_id.clone(), Arc::clone(&self.progress_sink)));

        let transfer_result = self
            .download_service
            .transfer(session.url(), &format_id, kind, &job_id)
            .await;

        stop_polling.cancel();
        let poll_outcome = poll_task.await.unwrap_or(PollOutcome::Cancelled);

        match transfer_result {
            Ok(artifact_url) => {
                if let PollOutcome::Failed(message) = &poll_outcome {
                    warn!(
                        %flow_id, %job_id, message,
                        "Poller reported failure but the transfer succeeded"
                    );
                }

                self.progress_sink.progress(ProgressEvent::completed()).await;

                info!(%flow_id, %job_id, artifact_url = %artifact_url, "Download finished");

                Ok(artifact_url)
            }
            Err(error) => {
                if let PollOutcome::Completed = &poll_outcome {
                    warn!(
                        %flow_id, %job_id, ?error,
                        "Poller reported completion but the transfer failed"
                    );
                }

                Err(DownloadFlowError::TransferError(error))
            }
        }
    }
}

fn validate_url(raw_url: &str) -> Result<reqwest::Url, DownloadFlowError> {
    let trimmed = raw_url.trim();

    if trimmed.is_empty() {
        return Err(DownloadFlowError::InvalidUrl);
    }

    let url = reqwest::Url::parse(trimmed).map_err(|_| DownloadFlowError::InvalidUrl)?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(DownloadFlowError::InvalidUrl),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_of_well_formed_urls() {
        assert!(validate_url("https://media.example.com/watch?v=1").is_ok());
        assert!(validate_url("http://media.example.com/watch?v=1").is_ok());
        assert!(validate_url("  https://media.example.com/watch?v=1  ").is_ok());
    }

    #[test]
    fn test_validation_of_malformed_urls() {
        assert!(matches!(
            validate_url(""),
            Err(DownloadFlowError::InvalidUrl)
        ));
        assert!(matches!(
            validate_url("   "),
            Err(DownloadFlowError::InvalidUrl)
        ));
        assert!(matches!(
            validate_url("not a url"),
            Err(DownloadFlowError::InvalidUrl)
        ));
        assert!(matches!(
            validate_url("ftp://media.example.com/file"),
            Err(DownloadFlowError::InvalidUrl)
        ));
        assert!(matches!(
            validate_url("media.example.com/watch?v=1"),
            Err(DownloadFlowError::InvalidUrl)
        ));
    }
}
