use async_trait::async_trait;
use serde_json::Value;

use crate::domain::DomainError;

/// Posts JSON to a path relative to a configured base URL.
///
/// Implementors own the endpoint, credentials and timeout; callers only see
/// the parsed body of a 2xx response or a [`DomainError`]. Timeouts must be
/// reported as [`DomainError::Timeout`] so retry wrappers can recognise them.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn post(&self, path: &str, payload: &Value) -> Result<Value, DomainError>;
}
