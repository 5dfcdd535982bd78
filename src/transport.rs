//! Network seam between the session controller and the backend.
//!
//! [`Backend`] is the trait the controller is generic over; [`HttpBackend`]
//! is the `reqwest` implementation used in production.

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::{
    AnalyzeResponse, ChatRequest, ChatResponse, ErrorBody, HealthResponse, UploadResponse,
};
use crate::config::ClientConfig;
use crate::document::DocumentFile;
use crate::error::ClientError;

/// The four backend calls the front end makes.
pub trait Backend {
    /// `POST /upload` with the file as multipart field `file`.
    fn upload(
        &self,
        file: &DocumentFile,
    ) -> impl Future<Output = Result<UploadResponse, ClientError>> + Send;

    /// `POST /chat` with a JSON body.
    fn chat(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, ClientError>> + Send;

    /// `POST /analyze/` with the file as multipart field `file`.
    fn analyze(
        &self,
        file: &DocumentFile,
    ) -> impl Future<Output = Result<AnalyzeResponse, ClientError>> + Send;

    /// `GET /`.
    fn health(&self) -> impl Future<Output = Result<HealthResponse, ClientError>> + Send;
}

/// `reqwest`-backed [`Backend`].
pub struct HttpBackend {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Self {
        // Client::builder() can fail in exotic TLS setups; fall back to a
        // default client instead of aborting.
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn file_form(file: &DocumentFile) -> Result<reqwest::multipart::Form, ClientError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(reqwest::multipart::Form::new().part("file", part))
    }

    async fn post_file<T: DeserializeOwned>(
        &self,
        path: &str,
        file: &DocumentFile,
    ) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        debug!(%url, file = %file.name, bytes = file.bytes.len(), "uploading file");
        let resp = self
            .client
            .post(&url)
            .multipart(Self::file_form(file)?)
            .send()
            .await?;
        read_json(resp).await
    }
}

impl Backend for HttpBackend {
    async fn upload(&self, file: &DocumentFile) -> Result<UploadResponse, ClientError> {
        self.post_file("/upload", file).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let url = self.config.endpoint("/chat");
        let resp = self.client.post(&url).json(request).send().await?;
        read_json(resp).await
    }

    async fn analyze(&self, file: &DocumentFile) -> Result<AnalyzeResponse, ClientError> {
        self.post_file("/analyze/", file).await
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.config.endpoint("/");
        let resp = self.client.get(&url).send().await?;
        read_json(resp).await
    }
}

/// Decode a 2xx body as `T`, or turn a non-2xx reply into
/// [`ClientError::Server`] carrying the `detail` field when present.
async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ClientError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|b| b.detail);
        warn!(status = status.as_u16(), detail = ?detail, "backend rejected request");
        return Err(ClientError::Server {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_slice::<T>(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn http_backend_keeps_config() {
        let mut cfg = ClientConfig::new("http://127.0.0.1:8000");
        cfg.request_timeout = Duration::from_secs(7);
        let backend = HttpBackend::new(cfg.clone());
        assert_eq!(backend.config(), &cfg);
    }

    #[test]
    fn file_form_accepts_pdf_mime() {
        let file = DocumentFile::new("lease.pdf", b"%PDF-1.4".to_vec());
        assert!(HttpBackend::file_form(&file).is_ok());
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        // Port 9 (discard) on loopback is almost never listening.
        let mut cfg = ClientConfig::new("http://127.0.0.1:9");
        cfg.connect_timeout = Duration::from_millis(500);
        cfg.request_timeout = Duration::from_secs(2);
        let backend = HttpBackend::new(cfg);
        let err = backend.health().await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
    }
}
