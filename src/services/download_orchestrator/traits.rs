use crate::services::download_orchestrator::types::{MediaInfo, ProgressEvent, ProgressSnapshot};
use crate::types::{ArtifactUrl, FormatId, JobId, MediaKind};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub(crate) enum MediaResolverError {
    #[error("Unable to reach the media backend: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("{0}")]
    Rejected(String),
}

#[async_trait]
pub(crate) trait MediaResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<MediaInfo, MediaResolverError>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum DownloadServiceError {
    #[error("Unable to reach the media backend: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("{0}")]
    Rejected(String),
}

#[async_trait]
pub(crate) trait DownloadService: Send + Sync {
    async fn start(
        &self,
        url: &str,
        format_id: &FormatId,
        kind: MediaKind,
    ) -> Result<JobId, DownloadServiceError>;
    async fn fetch_progress(&self, job_id: &JobId)
        -> Result<ProgressSnapshot, DownloadServiceError>;
    async fn transfer(
        &self,
        url: &str,
        format_id: &FormatId,
        kind: MediaKind,
        job_id: &JobId,
    ) -> Result<ArtifactUrl, DownloadServiceError>;
}

#[async_trait]
pub(crate) trait ProgressSink: Send + Sync {
    async fn progress(&self, event: ProgressEvent);
    async fn failed(&self, message: &str);
}
