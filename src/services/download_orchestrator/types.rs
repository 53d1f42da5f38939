use crate::types::{FormatId, MediaKind};
use serde::Serialize;

/// Lifecycle state of a download job on the media backend.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum JobStatus {
    Starting,
    Downloading,
    Processing,
    Complete,
    Error,
}

impl JobStatus {
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct FormatDescriptor {
    pub(crate) format_id: FormatId,
    pub(crate) quality: Option<String>,
    pub(crate) ext: Option<String>,
    pub(crate) filesize_mb: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct MediaInfo {
    pub(crate) title: String,
    pub(crate) uploader: String,
    pub(crate) duration_secs: Option<u64>,
    pub(crate) thumbnail: Option<String>,
    pub(crate) video_formats: Vec<FormatDescriptor>,
    pub(crate) audio_formats: Vec<FormatDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProgressSnapshot {
    pub(crate) status: JobStatus,
    pub(crate) percentage: f64,
    pub(crate) message: Option<String>,
    pub(crate) speed: f64,
    pub(crate) eta_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProgressEvent {
    pub(crate) percentage: f64,
    pub(crate) message: String,
    pub(crate) speed: f64,
    pub(crate) eta_secs: u64,
}

const FALLBACK_MESSAGE: &str = "Downloading...";

impl ProgressEvent {
    pub(crate) fn from_snapshot(snapshot: &ProgressSnapshot) -> Self {
        Self {
            percentage: snapshot.percentage,
            message: snapshot
                .message
                .clone()
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
            speed: snapshot.speed,
            eta_secs: snapshot.eta_secs,
        }
    }

    pub(crate) fn completed() -> Self {
        Self {
            percentage: 100.0,
            message: "Download complete!".to_string(),
            speed: 0.0,
            eta_secs: 0,
        }
    }
}

/// Everything known about one requested URL after resolution. Each incoming
/// request gets its own session, so earlier requests can never leak formats
/// or metadata into later ones.
#[derive(Debug)]
pub(crate) struct DownloadSession {
    url: reqwest::Url,
    media_info: MediaInfo,
}

impl DownloadSession {
    pub(crate) fn new(url: reqwest::Url, media_info: MediaInfo) -> Self {
        Self { url, media_info }
    }

    pub(crate) fn url(&self) -> &str {
        self.url.as_str()
    }

    pub(crate) fn media_info(&self) -> &MediaInfo {
        &self.media_info
    }

    /// Formats the user may pick for the given kind. The backend's list is
    /// extended with a "best" sentinel the backend resolves on its own side.
    pub(crate) fn selectable_formats(&self, kind: MediaKind) -> Vec<FormatDescriptor> {
        let mut formats = match kind {
            MediaKind::Video => self.media_info.video_formats.clone(),
            MediaKind::Audio => self.media_info.audio_formats.clone(),
        };

        formats.push(best_descriptor(kind));

        formats
    }

    pub(crate) fn select_format(
        &self,
        requested: Option<&FormatId>,
        kind: MediaKind,
    ) -> Option<FormatId> {
        let requested = match requested {
            Some(format_id) => format_id,
            None => return Some(FormatId::best_for(kind)),
        };

        self.selectable_formats(kind)
            .into_iter()
            .map(|descriptor| descriptor.format_id)
            .find(|format_id| format_id == requested)
    }
}

fn best_descriptor(kind: MediaKind) -> FormatDescriptor {
    match kind {
        MediaKind::Video => FormatDescriptor {
            format_id: FormatId::best_for(kind),
            quality: Some("Best quality".to_string()),
            ext: Some("mp4".to_string()),
            filesize_mb: None,
        },
        MediaKind::Audio => FormatDescriptor {
            format_id: FormatId::best_for(kind),
            quality: Some("Best audio".to_string()),
            ext: Some("mp3".to_string()),
            filesize_mb: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media_info() -> MediaInfo {
        MediaInfo {
            title: "Test Clip".into(),
            uploader: "Test Channel".into(),
            duration_secs: Some(212),
            thumbnail: None,
            video_formats: vec![FormatDescriptor {
                format_id: "137".into(),
                quality: Some("1080p".into()),
                ext: Some("mp4".into()),
                filesize_mb: Some(33.1),
            }],
            audio_formats: vec![],
        }
    }

    fn session() -> DownloadSession {
        let url = reqwest::Url::parse("https://media.example.com/watch?v=1").unwrap();

        DownloadSession::new(url, media_info())
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!JobStatus::Starting.is_terminal());
        assert!(!JobStatus::Downloading.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn test_progress_event_falls_back_to_default_message() {
        let snapshot = ProgressSnapshot {
            status: JobStatus::Downloading,
            percentage: 42.5,
            message: None,
            speed: 1024.0,
            eta_secs: 30,
        };

        let event = ProgressEvent::from_snapshot(&snapshot);

        assert_eq!("Downloading...", event.message);
        assert_eq!(42.5, event.percentage);
    }

    #[test]
    fn test_completed_event() {
        let event = ProgressEvent::completed();

        assert_eq!(100.0, event.percentage);
        assert_eq!("Download complete!", event.message);
        assert_eq!(0.0, event.speed);
        assert_eq!(0, event.eta_secs);
    }

    #[test]
    fn test_selectable_formats_include_best_sentinel() {
        let video_ids = session()
            .selectable_formats(MediaKind::Video)
            .into_iter()
            .map(|descriptor| descriptor.format_id)
            .collect::<Vec<_>>();
        let audio_ids = session()
            .selectable_formats(MediaKind::Audio)
            .into_iter()
            .map(|descriptor| descriptor.format_id)
            .collect::<Vec<_>>();

        assert_eq!(vec![FormatId::from("137"), FormatId::from("best")], video_ids);
        assert_eq!(vec![FormatId::from("bestaudio")], audio_ids);
    }

    #[test]
    fn test_missing_format_falls_back_to_best() {
        let selected = session().select_format(None, MediaKind::Video);

        assert_eq!(Some(FormatId::from("best")), selected);
    }

    #[test]
    fn test_sentinel_format_is_always_selectable() {
        let selected = session().select_format(Some(&FormatId::from("best")), MediaKind::Video);

        assert_eq!(Some(FormatId::from("best")), selected);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let selected = session().select_format(Some(&FormatId::from("22")), MediaKind::Video);

        assert_eq!(None, selected);
    }

    #[test]
    fn test_format_from_another_kind_is_rejected() {
        let selected = session().select_format(Some(&FormatId::from("137")), MediaKind::Audio);

        assert_eq!(None, selected);
    }
}
