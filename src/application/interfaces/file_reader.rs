use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

#[async_trait]
pub trait FileReader: Send + Sync {
    /// Read the whole file and return its contents as standard base64.
    async fn read_as_base64(&self, path: &Path) -> Result<String, DomainError>;
}
