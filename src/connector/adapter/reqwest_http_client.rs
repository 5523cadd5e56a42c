use std::error::Error as StdError;
use std::io::ErrorKind;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use crate::application::HttpClient;
use crate::domain::{ClientConfig, DomainError};

/// [`HttpClient`] over `reqwest`, bound to one [`ClientConfig`].
///
/// The bearer credential and content type are installed as default headers
/// and the configured timeout covers the whole request, body included.
///
/// Failures are classified so the retry wrapper can tell them apart:
/// - reqwest timeouts, `TimedOut`/`ConnectionAborted` I/O errors anywhere in the
///   source chain and messages mentioning a timeout → [`DomainError::Timeout`]
/// - any other transport failure → [`DomainError::Network`]
/// - non-2xx responses → [`DomainError::Http`]
/// - bodies that are not JSON → [`DomainError::InvalidResponse`]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestHttpClient {
    pub fn new(config: ClientConfig) -> Result<Self, DomainError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
            .map_err(|_| DomainError::invalid_input("API key contains invalid header characters"))?;
        auth.set_sensitive(true);

        let content_type = HeaderValue::from_str(config.content_type()).map_err(|_| {
            DomainError::invalid_input(format!("invalid content type: {}", config.content_type()))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, content_type);

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post(&self, path: &str, payload: &Value) -> Result<Value, DomainError> {
        let url = self.config.endpoint(path);
        let body = serde_json::to_vec(payload)
            .map_err(|e| DomainError::internal(format!("failed to serialize payload: {e}")))?;

        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .body(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("HTTP client: failed to read error body from {url}: {e}");
                    String::new()
                }
            };
            warn!("HTTP client: {url} returned {status}: {body}");
            return Err(DomainError::http(status.as_u16(), body));
        }

        let bytes = response.bytes().await.map_err(classify_transport_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::invalid_response(format!("response body is not JSON: {e}")))
    }
}

pub fn classify_transport_error(error: reqwest::Error) -> DomainError {
    if is_timeout_error(&error) {
        DomainError::timeout(error.to_string())
    } else {
        DomainError::network(error.to_string())
    }
}

fn is_timeout_error(error: &reqwest::Error) -> bool {
    if error.is_timeout() {
        return true;
    }

    chain_has_timeout(error) || mentions_timeout(&error.to_string())
}

/// Whether `error` or anything in its source chain is a timed-out or aborted
/// I/O error.
fn chain_has_timeout(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if matches!(io.kind(), ErrorKind::TimedOut | ErrorKind::ConnectionAborted) {
                return true;
            }
        }
        current = err.source();
    }
    false
}

fn mentions_timeout(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("timeout") || message.contains("timed out")
}
