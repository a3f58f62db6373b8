use async_trait::async_trait;
use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::Client;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::error::TransportError;
use super::payload::SubmissionPayload;
use crate::settings::ApiConfig;

/// What came back from one candidate endpoint.
///
/// Available as soon as the status line arrives; the body is read on demand
/// with [`BackendResponse::body`].
pub struct BackendResponse {
    pub status: u16,
    body: BoxFuture<'static, Result<Bytes, TransportError>>,
}

impl BackendResponse {
    pub fn new<F>(status: u16, body: F) -> Self
    where
        F: Future<Output = Result<Bytes, TransportError>> + Send + 'static,
    {
        Self {
            status,
            body: body.boxed(),
        }
    }

    /// A response whose body is already in memory
    pub fn ready(status: u16, body: impl Into<Bytes>) -> Self {
        Self::new(status, futures::future::ready(Ok(body.into())))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Read the rest of the body
    pub async fn body(self) -> Result<Bytes, TransportError> {
        self.body.await
    }
}

impl fmt::Debug for BackendResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Transport seam between the orchestrator and the formatting service
#[async_trait]
pub trait FormattingBackend: Send + Sync {
    /// POST the payload as a multipart form to `path`, resolving once the
    /// status arrives
    async fn post_form(
        &self,
        path: &str,
        payload: &SubmissionPayload,
    ) -> Result<BackendResponse, TransportError>;

    /// Base address results are resolved against
    fn base_url(&self) -> &str;
}

/// Talks to the real service over HTTP
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl FormattingBackend for HttpBackend {
    async fn post_form(
        &self,
        path: &str,
        payload: &SubmissionPayload,
    ) -> Result<BackendResponse, TransportError> {
        let url = self.endpoint(path);
        let transport = |e: reqwest::Error| TransportError::Request {
            path: path.to_string(),
            message: e.to_string(),
        };

        let form = payload.to_form().map_err(transport)?;
        debug!("POST {}", url);
        let resp = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            return Ok(BackendResponse::ready(status, Bytes::new()));
        }

        let path = path.to_string();
        Ok(BackendResponse::new(status, async move {
            resp.bytes().await.map_err(|e| TransportError::Request {
                path,
                message: format!("reading response body: {e}"),
            })
        }))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

const DRYRUN_BASE_URL: &str = "https://dryrun.invalid";

/// Answers every request with a synthetic success without touching the network
pub struct DryrunBackend {
    latency: Duration,
}

impl DryrunBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl FormattingBackend for DryrunBackend {
    async fn post_form(
        &self,
        path: &str,
        payload: &SubmissionPayload,
    ) -> Result<BackendResponse, TransportError> {
        info!("[dryrun] POST {} with {} field(s)", path, payload.fields().len());
        tokio::time::sleep(self.latency).await;

        let body = serde_json::json!({
            "docxUrl": format!("{DRYRUN_BASE_URL}/output/contrato_formatado.docx"),
            "pdfUrl": format!("{DRYRUN_BASE_URL}/output/contrato_visualizacao.pdf"),
        });
        Ok(BackendResponse::ready(200, body.to_string()))
    }

    fn base_url(&self) -> &str {
        DRYRUN_BASE_URL
    }
}

/// Pick the backend for the current mode
pub fn create_backend(api: &ApiConfig, dryrun: bool) -> reqwest::Result<Arc<dyn FormattingBackend>> {
    if dryrun {
        Ok(Arc::new(DryrunBackend::new(Duration::from_millis(800))))
    } else {
        Ok(Arc::new(HttpBackend::new(api.base_url.clone())?))
    }
}
