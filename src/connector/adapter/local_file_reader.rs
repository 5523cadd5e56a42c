use std::path::Path;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};

use crate::application::FileReader;
use crate::domain::DomainError;

/// Reads files from the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileReader;

impl LocalFileReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileReader for LocalFileReader {
    async fn read_as_base64(&self, path: &Path) -> Result<String, DomainError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(general_purpose::STANDARD.encode(bytes))
    }
}
