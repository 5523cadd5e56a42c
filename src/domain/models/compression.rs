/// Encoded length above which the first attempt is thrown away.
pub const MAX_ENCODED_LEN: usize = 1_000_000;

pub const FIRST_ATTEMPT: CompressionAttempt = CompressionAttempt {
    width: 800,
    quality: 0.7,
    format: OutputFormat::Jpeg,
};

pub const FALLBACK_ATTEMPT: CompressionAttempt = CompressionAttempt {
    width: 600,
    quality: 0.5,
    format: OutputFormat::Jpeg,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// One resize + re-encode pass: target width, quality in `0.0..=1.0`, format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionAttempt {
    pub width: u32,
    pub quality: f32,
    pub format: OutputFormat,
}

impl CompressionAttempt {
    pub fn new(width: u32, quality: f32, format: OutputFormat) -> Self {
        Self {
            width,
            quality,
            format,
        }
    }

    /// Quality on the JPEG encoder's 1-100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality.clamp(0.0, 1.0) * 100.0).round().max(1.0) as u8
    }

    /// Height that keeps the source aspect ratio at the target width.
    pub fn scaled_height(&self, source_width: u32, source_height: u32) -> u32 {
        if source_width == 0 {
            return source_height.max(1);
        }
        let ratio = f64::from(self.width) / f64::from(source_width);
        ((f64::from(source_height) * ratio).round() as u32).max(1)
    }
}
