use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::{report, FileReader, ImageManipulator, ProgressSink};
use crate::domain::{CompressionAttempt, DomainError, FALLBACK_ATTEMPT, FIRST_ATTEMPT, MAX_ENCODED_LEN};

pub const COMPRESSING_STATUS: &str = "Compressing image...";
pub const STILL_LARGE_STATUS: &str = "Image still large, applying additional compression...";

/// Turns a local image into a base64 JPEG small enough to attach to a request.
///
/// Two passes at most: 800px / 0.7 first, and only if that encodes to more
/// than [`MAX_ENCODED_LEN`] characters, 600px / 0.5 from the original source.
/// The second result replaces the first even if it is still oversized.
pub struct PrepareImageUseCase {
    manipulator: Arc<dyn ImageManipulator>,
    reader: Arc<dyn FileReader>,
}

impl PrepareImageUseCase {
    pub fn new(manipulator: Arc<dyn ImageManipulator>, reader: Arc<dyn FileReader>) -> Self {
        Self {
            manipulator,
            reader,
        }
    }

    pub async fn execute(
        &self,
        source: &Path,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<String, DomainError> {
        match self.compress(source, progress).await {
            Ok(encoded) => Ok(encoded),
            Err(e) => {
                error!("Error compressing image {}: {}", source.display(), e);
                Err(e)
            }
        }
    }

    async fn compress(
        &self,
        source: &Path,
        progress: Option<&dyn ProgressSink>,
    ) -> Result<String, DomainError> {
        report(progress, COMPRESSING_STATUS);
        info!("Starting image compression: {}", source.display());

        let mut encoded = self.attempt(source, &FIRST_ATTEMPT).await?;

        if encoded.len() > MAX_ENCODED_LEN {
            debug!(
                "First pass produced {} base64 chars (limit {}), retrying from source",
                encoded.len(),
                MAX_ENCODED_LEN
            );
            report(progress, STILL_LARGE_STATUS);
            encoded = self.attempt(source, &FALLBACK_ATTEMPT).await?;
        }

        info!("Compressed image size: {} KB", encoded_kilobytes(&encoded));
        Ok(encoded)
    }

    async fn attempt(
        &self,
        source: &Path,
        attempt: &CompressionAttempt,
    ) -> Result<String, DomainError> {
        let output = self.manipulator.manipulate(source, attempt).await?;
        let encoded = self.reader.read_as_base64(&output).await;

        // Attempt outputs never outlive the call, whether or not the read worked.
        if let Err(e) = tokio::fs::remove_file(&output).await {
            warn!("Failed to remove compressed image {}: {}", output.display(), e);
        }

        encoded
    }
}

/// Encoded length in KB, rounded to the nearest whole number.
pub fn encoded_kilobytes(encoded: &str) -> usize {
    (encoded.len() + 512) / 1024
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::OutputFormat;

    /// Writes nothing; names the output after the attempt's width and records calls.
    #[derive(Default)]
    struct RecordingManipulator {
        calls: Mutex<Vec<(PathBuf, CompressionAttempt)>>,
        fail_on_width: Option<u32>,
    }

    #[async_trait]
    impl ImageManipulator for RecordingManipulator {
        async fn manipulate(
            &self,
            source: &Path,
            attempt: &CompressionAttempt,
        ) -> Result<PathBuf, DomainError> {
            self.calls
                .lock()
                .unwrap()
                .push((source.to_path_buf(), *attempt));
            if self.fail_on_width == Some(attempt.width) {
                return Err(DomainError::image("unsupported image format"));
            }
            Ok(PathBuf::from(format!("/cache/{}.jpg", attempt.width)))
        }
    }

    /// Returns a canned base64 string of a given length per output path.
    struct SizedReader {
        lengths: HashMap<PathBuf, usize>,
        reads: AtomicUsize,
    }

    impl SizedReader {
        fn new(first: usize, fallback: usize) -> Self {
            let mut lengths = HashMap::new();
            lengths.insert(PathBuf::from("/cache/800.jpg"), first);
            lengths.insert(PathBuf::from("/cache/600.jpg"), fallback);
            Self {
                lengths,
                reads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FileReader for SizedReader {
        async fn read_as_base64(&self, path: &Path) -> Result<String, DomainError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let len = self.lengths.get(path).copied().ok_or_else(|| {
                DomainError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    path.display().to_string(),
                ))
            })?;
            let fill = if path.ends_with("800.jpg") { 'A' } else { 'B' };
            Ok(std::iter::repeat(fill).take(len).collect())
        }
    }

    fn use_case(
        manipulator: Arc<RecordingManipulator>,
        reader: Arc<SizedReader>,
    ) -> PrepareImageUseCase {
        PrepareImageUseCase::new(manipulator, reader)
    }

    #[tokio::test]
    async fn test_small_first_attempt_is_returned_without_fallback() {
        let manipulator = Arc::new(RecordingManipulator::default());
        let reader = Arc::new(SizedReader::new(MAX_ENCODED_LEN, 10));
        let encoded = use_case(manipulator.clone(), reader.clone())
            .execute(Path::new("/photos/essay.png"), None)
            .await
            .unwrap();

        assert_eq!(encoded.len(), MAX_ENCODED_LEN);
        assert!(encoded.starts_with('A'));

        let calls = manipulator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, FIRST_ATTEMPT);
        assert_eq!(reader.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_large_first_attempt_is_replaced_by_fallback() {
        let manipulator = Arc::new(RecordingManipulator::default());
        let reader = Arc::new(SizedReader::new(MAX_ENCODED_LEN + 1, 400_000));
        let encoded = use_case(manipulator.clone(), reader)
            .execute(Path::new("/photos/essay.png"), None)
            .await
            .unwrap();

        assert_eq!(encoded.len(), 400_000);
        assert!(encoded.chars().all(|c| c == 'B'));

        let calls = manipulator.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].1.width, 600);
        assert_eq!(calls[1].1.format, OutputFormat::Jpeg);
        // Both passes start from the original file, not the first output.
        assert_eq!(calls[0].0, PathBuf::from("/photos/essay.png"));
        assert_eq!(calls[1].0, PathBuf::from("/photos/essay.png"));
    }

    #[tokio::test]
    async fn test_oversized_fallback_is_still_returned() {
        let manipulator = Arc::new(RecordingManipulator::default());
        let reader = Arc::new(SizedReader::new(3_000_000, 2_000_000));
        let encoded = use_case(manipulator.clone(), reader)
            .execute(Path::new("/photos/poster.jpg"), None)
            .await
            .unwrap();

        assert_eq!(encoded.len(), 2_000_000);
        assert_eq!(manipulator.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_progress_messages() {
        let manipulator = Arc::new(RecordingManipulator::default());
        let reader = Arc::new(SizedReader::new(MAX_ENCODED_LEN + 1, 10));
        let seen = Mutex::new(Vec::<String>::new());
        let sink = |status: &str| seen.lock().unwrap().push(status.to_string());

        use_case(manipulator, reader)
            .execute(Path::new("/photos/essay.png"), Some(&sink as &dyn ProgressSink))
            .await
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![COMPRESSING_STATUS.to_string(), STILL_LARGE_STATUS.to_string()]
        );
    }

    #[tokio::test]
    async fn test_manipulation_failure_aborts() {
        let manipulator = Arc::new(RecordingManipulator {
            fail_on_width: Some(600),
            ..Default::default()
        });
        let reader = Arc::new(SizedReader::new(MAX_ENCODED_LEN + 1, 10));
        let err = use_case(manipulator, reader)
            .execute(Path::new("/photos/essay.png"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Image(_)));
    }

    #[tokio::test]
    async fn test_read_failure_aborts() {
        let manipulator = Arc::new(RecordingManipulator::default());
        let reader = Arc::new(SizedReader {
            lengths: HashMap::new(),
            reads: AtomicUsize::new(0),
        });
        let err = use_case(manipulator.clone(), reader)
            .execute(Path::new("/photos/essay.png"), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Io(_)));
        assert_eq!(manipulator.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_encoded_kilobytes_rounds() {
        assert_eq!(encoded_kilobytes(""), 0);
        assert_eq!(encoded_kilobytes(&"x".repeat(1535)), 1);
        assert_eq!(encoded_kilobytes(&"x".repeat(1536)), 2);
    }
}
