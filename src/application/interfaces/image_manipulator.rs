use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{CompressionAttempt, DomainError};

/// Resizes and re-encodes an image into a new file.
#[async_trait]
pub trait ImageManipulator: Send + Sync {
    /// Apply `attempt` to `source` and return the path of the written result.
    /// The source file is never modified.
    async fn manipulate(
        &self,
        source: &Path,
        attempt: &CompressionAttempt,
    ) -> Result<PathBuf, DomainError>;
}
