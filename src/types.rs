use serde::{Deserialize, Serialize};
use std::ops::Deref;
use uuid::Uuid;

/// Identifier assigned by the media backend when a download job starts.
#[derive(Eq, PartialEq, Clone, Hash, Debug, Serialize)]
pub(crate) struct JobId(pub(crate) String);

impl From<String> for JobId {
    fn from(value: String) -> Self {
        JobId(value)
    }
}

impl Deref for JobId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Eq, PartialEq, Clone, Hash, Debug, Serialize)]
pub(crate) struct FormatId(pub(crate) String);

impl FormatId {
    pub(crate) fn best_for(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Video => FormatId("best".to_string()),
            MediaKind::Audio => FormatId("bestaudio".to_string()),
        }
    }
}

impl From<String> for FormatId {
    fn from(value: String) -> Self {
        FormatId(value)
    }
}

impl From<&str> for FormatId {
    fn from(value: &str) -> Self {
        FormatId(value.to_string())
    }
}

impl Deref for FormatId {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for FormatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum MediaKind {
    #[default]
    Video,
    Audio,
}

impl MediaKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Location of the finished file served by the media backend.
#[derive(Eq, PartialEq, Clone, Debug, Serialize)]
pub(crate) struct ArtifactUrl(pub(crate) String);

impl Deref for ArtifactUrl {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ArtifactUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug)]
pub(crate) struct FlowId(Uuid);

impl Into<FlowId> for Uuid {
    fn into(self) -> FlowId {
        FlowId(self)
    }
}

impl std::fmt::Display for FlowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
