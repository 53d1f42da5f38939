use crate::services::{
    DownloadFlowError, DownloadOrchestrator, DownloadServiceError, FormatDescriptor,
    MediaResolverError,
};
use crate::types::{FormatId, MediaKind};
use actix_web::http::StatusCode;
use actix_web::web::{Data, Json};
use actix_web::{HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

#[derive(Deserialize)]
pub(crate) struct ResolveRequest {
    url: String,
}

#[derive(Serialize)]
struct FormatView {
    format_id: String,
    quality: Option<String>,
    ext: Option<String>,
    filesize: Option<f64>,
}

impl From<FormatDescriptor> for FormatView {
    fn from(descriptor: FormatDescriptor) -> Self {
        Self {
            format_id: descriptor.format_id.0,
            quality: descriptor.quality,
            ext: descriptor.ext,
            filesize: descriptor.filesize_mb,
        }
    }
}

#[derive(Serialize)]
struct ResolveResponse {
    title: String,
    uploader: String,
    duration: String,
    thumbnail: Option<String>,
    video_formats: Vec<FormatView>,
    audio_formats: Vec<FormatView>,
}

pub(crate) async fn resolve_media(
    orchestrator: Data<Arc<DownloadOrchestrator>>,
    request: Json<ResolveRequest>,
) -> impl Responder {
    let session = match orchestrator.resolve(&request.url).await {
        Ok(session) => session,
        Err(error) => return error_response(error),
    };

    let media_info = session.media_info();

    HttpResponse::Ok().json(ResolveResponse {
        title: media_info.title.clone(),
        uploader: media_info.uploader.clone(),
        duration: format_duration(media_info.duration_secs),
        thumbnail: media_info.thumbnail.clone(),
        video_formats: session
            .selectable_formats(MediaKind::Video)
            .into_iter()
            .map(FormatView::from)
            .collect(),
        audio_formats: session
            .selectable_formats(MediaKind::Audio)
            .into_iter()
            .map(FormatView::from)
            .collect(),
    })
}

#[derive(Deserialize)]
pub(crate) struct DownloadRequest {
    url: String,
    #[serde(default)]
    format_id: Option<String>,
    #[serde(rename = "type", default)]
    kind: MediaKind,
}

#[derive(Serialize)]
struct DownloadResponse {
    success: bool,
    download_url: String,
}

/// Runs one full download flow per request. Each request resolves its own
/// session, so repeating a request always starts from a clean slate.
pub(crate) async fn request_download(
    orchestrator: Data<Arc<DownloadOrchestrator>>,
    request: Json<DownloadRequest>,
) -> impl Responder {
    let requested_format = request.format_id.clone().map(FormatId::from);

    let session = match orchestrator.resolve(&request.url).await {
        Ok(session) => session,
        Err(error) => return error_response(error),
    };

    match orchestrator
        .download(&session, requested_format.as_ref(), request.kind)
        .await
    {
        Ok(artifact_url) => HttpResponse::Ok().json(DownloadResponse {
            success: true,
            download_url: artifact_url.to_string(),
        }),
        Err(error) => error_response(error),
    }
}

fn error_response(error: DownloadFlowError) -> HttpResponse {
    error!(%error, "Download flow failed");

    let status = match &error {
        DownloadFlowError::InvalidUrl | DownloadFlowError::UnknownFormat => {
            StatusCode::BAD_REQUEST
        }
        DownloadFlowError::ResolverError(MediaResolverError::Transport(_))
        | DownloadFlowError::StartError(DownloadServiceError::Transport(_))
        | DownloadFlowError::TransferError(DownloadServiceError::Transport(_)) => {
            StatusCode::BAD_GATEWAY
        }
        DownloadFlowError::ResolverError(_) => StatusCode::BAD_REQUEST,
        DownloadFlowError::StartError(_) | DownloadFlowError::TransferError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    HttpResponse::build(status).json(serde_json::json!({ "error": error.to_string() }))
}

fn format_duration(duration_secs: Option<u64>) -> String {
    let secs = match duration_secs {
        Some(secs) => secs,
        None => return "Unknown".to_string(),
    };

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::format_duration;

    #[test]
    fn test_formatting_of_durations() {
        assert_eq!("Unknown", format_duration(None));
        assert_eq!("0:00", format_duration(Some(0)));
        assert_eq!("0:59", format_duration(Some(59)));
        assert_eq!("3:32", format_duration(Some(212)));
        assert_eq!("1:01:01", format_duration(Some(3661)));
    }
}
