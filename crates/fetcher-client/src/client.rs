use crate::types::{
    ErrorResponse, MediaInfoResponse, ProgressResponse, StartResponse, TransferResponse,
};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::debug;

const REJECTED_FALLBACK_TEXT: &str = "The media backend rejected the request";
const START_FAILURE_FALLBACK_TEXT: &str = "The media backend was unable to start the download";
const TRANSFER_FAILURE_FALLBACK_TEXT: &str = "The media backend was unable to serve the file";

#[derive(Debug, thiserror::Error)]
pub enum FetcherClientError {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
    #[error("Malformed response from the media backend")]
    MalformedResponse,
}

pub struct FetcherClient {
    client: Client,
    endpoint: String,
}

impl FetcherClient {
    pub fn create(endpoint: &str) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP Client");

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_info(&self, url: &str) -> Result<MediaInfoResponse, FetcherClientError> {
        #[derive(Serialize)]
        struct FetchInfoForm<'a> {
            url: &'a str,
        }

        debug!(url, "Requesting media information");

        let response = self
            .client
            .post(format!("{}/fetch_info", self.endpoint))
            .json(&FetchInfoForm { url })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetcherClientError::Rejected(
                read_error_message(response).await,
            ));
        }

        response
            .json()
            .await
            .map_err(|_| FetcherClientError::MalformedResponse)
    }

    pub async fn start_download(
        &self,
        url: &str,
        format_id: &str,
        media_type: &str,
    ) -> Result<String, FetcherClientError> {
        #[derive(Serialize)]
        struct StartDownloadForm<'a> {
            url: &'a str,
            format_id: &'a str,
            #[serde(rename = "type")]
            media_type: &'a str,
        }

        debug!(url, format_id, media_type, "Starting download job");

        let response = self
            .client
            .post(format!("{}/start_download", self.endpoint))
            .json(&StartDownloadForm {
                url,
                format_id,
                media_type,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetcherClientError::Rejected(
                read_error_message(response).await,
            ));
        }

        let body = response
            .json::<StartResponse>()
            .await
            .map_err(|_| FetcherClientError::MalformedResponse)?;

        match body {
            StartResponse {
                success: true,
                download_id: Some(download_id),
                ..
            } => Ok(download_id),
            StartResponse { error, .. } => Err(FetcherClientError::Rejected(
                error.unwrap_or_else(|| START_FAILURE_FALLBACK_TEXT.to_string()),
            )),
        }
    }

    pub async fn progress(&self, download_id: &str) -> Result<ProgressResponse, FetcherClientError> {
        let response = self
            .client
            .get(format!("{}/progress/{}", self.endpoint, download_id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetcherClientError::Rejected(
                read_error_message(response).await,
            ));
        }

        response
            .json()
            .await
            .map_err(|_| FetcherClientError::MalformedResponse)
    }

    pub async fn download(
        &self,
        url: &str,
        format_id: &str,
        media_type: &str,
        download_id: &str,
    ) -> Result<String, FetcherClientError> {
        #[derive(Serialize)]
        struct DownloadForm<'a> {
            url: &'a str,
            format_id: &'a str,
            #[serde(rename = "type")]
            media_type: &'a str,
            download_id: &'a str,
        }

        debug!(url, format_id, download_id, "Requesting file transfer");

        let response = self
            .client
            .post(format!("{}/download", self.endpoint))
            .json(&DownloadForm {
                url,
                format_id,
                media_type,
                download_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetcherClientError::Rejected(
                read_error_message(response).await,
            ));
        }

        let body = response
            .json::<TransferResponse>()
            .await
            .map_err(|_| FetcherClientError::MalformedResponse)?;

        match body {
            TransferResponse {
                success: true,
                download_url: Some(download_url),
                ..
            } => Ok(download_url),
            TransferResponse { error, .. } => Err(FetcherClientError::Rejected(
                error.unwrap_or_else(|| TRANSFER_FAILURE_FALLBACK_TEXT.to_string()),
            )),
        }
    }

    pub async fn check_connection(&self) -> Result<(), FetcherClientError> {
        self.client
            .get(format!("{}/", self.endpoint))
            .send()
            .await?;

        Ok(())
    }
}

async fn read_error_message(response: Response) -> String {
    response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| REJECTED_FALLBACK_TEXT.to_string())
}
