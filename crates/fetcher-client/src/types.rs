use serde::{Deserialize, Deserializer};

/// Lifecycle state reported by the media backend for a download job.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Starting,
    Downloading,
    Processing,
    Complete,
    Error,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FormatEntry {
    pub format_id: String,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub filesize: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaInfoResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub duration: Option<f64>,
    #[serde(default)]
    pub video_formats: Vec<FormatEntry>,
    #[serde(default)]
    pub audio_formats: Vec<FormatEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressResponse {
    pub status: DownloadStatus,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub eta: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartResponse {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) download_id: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransferResponse {
    #[serde(default)]
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) download_url: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub(crate) error: Option<String>,
}

/// Backends report sizes and durations either as numbers or as a placeholder
/// string such as "Unknown". Anything that does not parse as a number maps
/// to `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(number)) => Some(number),
        Some(NumberOrText::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}
