mod download;
mod health;

pub(crate) use download::{request_download, resolve_media};
pub(crate) use health::readiness_check;
