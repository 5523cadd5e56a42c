use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::application::HttpClient;
use crate::domain::{ClientConfig, DomainError};

use super::ReqwestHttpClient;

/// Wraps another [`HttpClient`] and reissues a request once when it times out.
///
/// Only [`DomainError::Timeout`] triggers the retry. The retry sends the same
/// path and payload; whatever it returns, success or failure, is handed back
/// as is. There is no second retry and no backoff.
pub struct RetryingHttpClient {
    inner: Arc<dyn HttpClient>,
}

impl RetryingHttpClient {
    pub fn new(inner: Arc<dyn HttpClient>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl HttpClient for RetryingHttpClient {
    async fn post(&self, path: &str, payload: &Value) -> Result<Value, DomainError> {
        match self.inner.post(path, payload).await {
            Err(e) if e.is_timeout() => {
                warn!("Request timed out, retrying... ({e})");
                self.inner.post(path, payload).await
            }
            other => other,
        }
    }
}

/// The client the application uses: reqwest with one retry on timeout.
pub fn build_http_client(config: ClientConfig) -> Result<Arc<dyn HttpClient>, DomainError> {
    let transport = Arc::new(ReqwestHttpClient::new(config)?);
    Ok(Arc::new(RetryingHttpClient::new(transport)))
}
