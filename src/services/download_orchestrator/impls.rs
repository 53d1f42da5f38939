use crate::services::download_orchestrator::traits::{
    DownloadService, DownloadServiceError, MediaResolver, MediaResolverError, ProgressSink,
};
use crate::services::download_orchestrator::types::{
    FormatDescriptor, JobStatus, MediaInfo, ProgressEvent, ProgressSnapshot,
};
use crate::types::{ArtifactUrl, FormatId, JobId, MediaKind};
use async_trait::async_trait;
use fetcher_client::{
    DownloadStatus, FetcherClient, FetcherClientError, FormatEntry, MediaInfoResponse,
    ProgressResponse,
};
use std::sync::Arc;
use tracing::{error, info};

const FALLBACK_TITLE: &str = "Unknown Title";
const FALLBACK_UPLOADER: &str = "Unknown";
const MALFORMED_RESOLUTION_TEXT: &str = "Received an invalid response from the media backend";

pub(crate) struct BackendMediaResolver(pub(crate) Arc<FetcherClient>);

#[async_trait]
impl MediaResolver for BackendMediaResolver {
    async fn resolve(&self, url: &str) -> Result<MediaInfo, MediaResolverError> {
        let response = self.0.fetch_info(url).await.map_err(resolver_error)?;

        Ok(media_info_from_response(response))
    }
}

pub(crate) struct BackendDownloadService(pub(crate) Arc<FetcherClient>);

#[async_trait]
impl DownloadService for BackendDownloadService {
    async fn start(
        &self,
        url: &str,
        format_id: &FormatId,
        kind: MediaKind,
    ) -> Result<JobId, DownloadServiceError> {
        let download_id = self
            .0
            .start_download(url, format_id, kind.as_str())
            .await
            .map_err(service_error)?;

        Ok(JobId(download_id))
    }

    async fn fetch_progress(
        &self,
        job_id: &JobId,
    ) -> Result<ProgressSnapshot, DownloadServiceError> {
        let response = self.0.progress(job_id).await.map_err(service_error)?;

        Ok(snapshot_from_response(response))
    }

    async fn transfer(
        &self,
        url: &str,
        format_id: &FormatId,
        kind: MediaKind,
        job_id: &JobId,
    ) -> Result<ArtifactUrl, DownloadServiceError> {
        let download_url = self
            .0
            .download(url, format_id, kind.as_str(), job_id)
            .await
            .map_err(service_error)?;

        Ok(ArtifactUrl(download_url))
    }
}

/// Publishes progress through the application log. The web front end gets
/// its progress from the backend directly, so the server side only needs
/// the trail for operators.
pub(crate) struct LoggingProgressSink;

#[async_trait]
impl ProgressSink for LoggingProgressSink {
    async fn progress(&self, event: ProgressEvent) {
        info!(
            percentage = event.percentage,
            speed = event.speed,
            eta_secs = event.eta_secs,
            "{}",
            event.message
        );
    }

    async fn failed(&self, message: &str) {
        error!("Download job failed: {}", message);
    }
}

fn resolver_error(error: FetcherClientError) -> MediaResolverError {
    match error {
        FetcherClientError::ReqwestError(error) => MediaResolverError::Transport(Box::new(error)),
        FetcherClientError::Rejected(message) => MediaResolverError::Rejected(message),
        FetcherClientError::MalformedResponse => {
            MediaResolverError::Rejected(MALFORMED_RESOLUTION_TEXT.to_string())
        }
    }
}

fn service_error(error: FetcherClientError) -> DownloadServiceError {
    match error {
        FetcherClientError::ReqwestError(error) => DownloadServiceError::Transport(Box::new(error)),
        FetcherClientError::Rejected(message) => DownloadServiceError::Rejected(message),
        FetcherClientError::MalformedResponse => {
            DownloadServiceError::Rejected(MALFORMED_RESOLUTION_TEXT.to_string())
        }
    }
}

fn media_info_from_response(response: MediaInfoResponse) -> MediaInfo {
    MediaInfo {
        title: response
            .title
            .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
        uploader: response
            .uploader
            .unwrap_or_else(|| FALLBACK_UPLOADER.to_string()),
        duration_secs: response.duration.map(|secs| secs.max(0.0) as u64),
        thumbnail: response.thumbnail,
        video_formats: response
            .video_formats
            .into_iter()
            .map(format_from_entry)
            .collect(),
        audio_formats: response
            .audio_formats
            .into_iter()
            .map(format_from_entry)
            .collect(),
    }
}

fn format_from_entry(entry: FormatEntry) -> FormatDescriptor {
    FormatDescriptor {
        format_id: FormatId(entry.format_id),
        quality: entry.quality,
        ext: entry.ext,
        filesize_mb: entry.filesize,
    }
}

fn snapshot_from_response(response: ProgressResponse) -> ProgressSnapshot {
    ProgressSnapshot {
        status: status_from_wire(response.status),
        percentage: response.percentage,
        message: response.message,
        speed: response.speed.unwrap_or(0.0),
        eta_secs: response.eta.map(|eta| eta.max(0.0) as u64).unwrap_or(0),
    }
}

fn status_from_wire(status: DownloadStatus) -> JobStatus {
    match status {
        DownloadStatus::Starting => JobStatus::Starting,
        DownloadStatus::Downloading => JobStatus::Downloading,
        DownloadStatus::Processing => JobStatus::Processing,
        DownloadStatus::Complete => JobStatus::Complete,
        DownloadStatus::Error => JobStatus::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_info_fallbacks() {
        let response = MediaInfoResponse {
            title: None,
            uploader: None,
            thumbnail: None,
            duration: None,
            video_formats: vec![],
            audio_formats: vec![],
        };

        let media_info = media_info_from_response(response);

        assert_eq!("Unknown Title", media_info.title);
        assert_eq!("Unknown", media_info.uploader);
        assert_eq!(None, media_info.duration_secs);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(JobStatus::Starting, status_from_wire(DownloadStatus::Starting));
        assert_eq!(JobStatus::Complete, status_from_wire(DownloadStatus::Complete));
        assert_eq!(JobStatus::Error, status_from_wire(DownloadStatus::Error));
    }

    #[test]
    fn test_snapshot_clamps_negative_eta() {
        let response = ProgressResponse {
            status: DownloadStatus::Downloading,
            percentage: 10.0,
            message: None,
            speed: None,
            eta: Some(-1.0),
        };

        let snapshot = snapshot_from_response(response);

        assert_eq!(0, snapshot.eta_secs);
        assert_eq!(0.0, snapshot.speed);
    }
}
