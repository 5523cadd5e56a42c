use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::debug;
use uuid::Uuid;

use crate::application::ImageManipulator;
use crate::domain::{CompressionAttempt, DomainError, OutputFormat};

/// Directory under the system temp dir used when no output dir is given.
const DEFAULT_CACHE_DIR: &str = "gradewise";

/// [`ImageManipulator`] backed by the `image` crate.
///
/// Decoding, resizing and encoding are CPU bound, so each call runs on the
/// blocking thread pool. Results land in `output_dir` under a fresh UUID name.
pub struct ImageCrateManipulator {
    output_dir: PathBuf,
}

impl ImageCrateManipulator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join(DEFAULT_CACHE_DIR))
    }
}

impl Default for ImageCrateManipulator {
    fn default() -> Self {
        Self::in_temp_dir()
    }
}

#[async_trait]
impl ImageManipulator for ImageCrateManipulator {
    async fn manipulate(
        &self,
        source: &Path,
        attempt: &CompressionAttempt,
    ) -> Result<PathBuf, DomainError> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let source = source.to_path_buf();
        let output = self
            .output_dir
            .join(format!("{}.{}", Uuid::new_v4(), attempt.format.extension()));
        let attempt = *attempt;

        let written = output.clone();
        tokio::task::spawn_blocking(move || resize_and_encode(&source, &written, &attempt))
            .await
            .map_err(|e| DomainError::internal(format!("image task failed: {e}")))??;

        Ok(output)
    }
}

fn resize_and_encode(
    source: &Path,
    output: &Path,
    attempt: &CompressionAttempt,
) -> Result<(), DomainError> {
    let image = image::open(source)
        .map_err(|e| DomainError::image(format!("failed to decode {}: {e}", source.display())))?;

    let height = attempt.scaled_height(image.width(), image.height());
    debug!(
        "Resizing {} from {}x{} to {}x{} ({:?}, quality {})",
        source.display(),
        image.width(),
        image.height(),
        attempt.width,
        height,
        attempt.format,
        attempt.quality
    );
    let resized = image.resize_exact(attempt.width, height, FilterType::Triangle);

    let mut writer = BufWriter::new(File::create(output)?);
    match attempt.format {
        OutputFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut writer, attempt.jpeg_quality());
            // JPEG has no alpha channel.
            DynamicImage::ImageRgb8(resized.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(|e| DomainError::image(format!("failed to encode JPEG: {e}")))?;
        }
        OutputFormat::Png => {
            resized
                .write_to(&mut writer, ImageFormat::Png)
                .map_err(|e| DomainError::image(format!("failed to encode PNG: {e}")))?;
        }
    }
    writer.flush()?;

    Ok(())
}
