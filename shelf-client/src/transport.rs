//! Transport layer: one logical HTTP call per operation, no internal retry.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::types::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Issues HTTP requests and returns parsed JSON or an error.
///
/// Implementations make exactly one attempt per call; retry, if any, is the
/// caller's policy. This is the seam the synchronizer's tests mock.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError>;
}

/// reqwest-backed transport against the library-management REST service.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, TransportError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = &body {
            request = request.json(body);
        }
        debug!(%method, path, "dispatching request");

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            // Handle 204 No Content
            if status.as_u16() == 204 {
                return Ok(Value::Null);
            }
            Ok(response.json::<Value>().await?)
        } else {
            let text = response.text().await?;
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(body) if !body.message.is_empty() => body.message,
                _ => text,
            };
            warn!(%method, path, status = status.as_u16(), "request failed");
            Err(TransportError::Status {
                status: status.as_u16(),
                message,
            })
        }
    }
}
