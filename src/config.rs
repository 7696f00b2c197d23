//! Configuration for the PDF-to-slides conversion pipeline.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config across conversion attempts and to diff two
//! runs to understand why their slide sets differ.

use crate::error::Pdf2SlidesError;
use serde::{Deserialize, Serialize};

/// Default rendering resolution in DPI.
pub const DEFAULT_DPI: u32 = 200;
/// Default maximum slide width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 1920;
/// Default maximum slide height in pixels.
pub const DEFAULT_MAX_HEIGHT: u32 = 1080;
/// Default JPEG encoding quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Output encoding for slide images.
///
/// JPEG is the default: slides are photographic-scale raster pages where a
/// quality-85 JPEG is a fraction of the PNG size and visually identical on a
/// projector. PNG remains available for decks with fine line art.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideFormat {
    /// Lossless PNG.
    Png,
    /// Lossy JPEG at the configured quality. (default)
    #[default]
    Jpeg,
}

impl SlideFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            SlideFormat::Png => "png",
            SlideFormat::Jpeg => "jpg",
        }
    }

    /// MIME type for serving the encoded image.
    pub fn mime_type(self) -> &'static str {
        match self {
            SlideFormat::Png => "image/png",
            SlideFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Configuration for a conversion attempt.
///
/// # Example
/// ```rust
/// use pdf2slides::{ConversionConfig, SlideFormat};
///
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .format(SlideFormat::Png)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 200.
    ///
    /// 200 DPI keeps text on a typical slide sharp at fullscreen while the
    /// optimizer caps the final pixel dimensions, so higher DPI mostly buys
    /// better downsampling input rather than bigger files.
    pub dpi: u32,

    /// Maximum slide width in pixels. Default: 1920.
    pub max_width: u32,

    /// Maximum slide height in pixels. Default: 1080.
    ///
    /// Together with `max_width` this bounds every slide to a Full-HD frame.
    /// Images already within bounds are passed through untouched.
    pub max_height: u32,

    /// Output image format. Default: JPEG.
    pub format: SlideFormat,

    /// JPEG encoding quality, 1–100. Default: 85. Ignored for PNG.
    pub jpeg_quality: u8,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            format: SlideFormat::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_width(mut self, px: u32) -> Self {
        self.config.max_width = px.max(1);
        self
    }

    pub fn max_height(mut self, px: u32) -> Self {
        self.config.max_height = px.max(1);
        self
    }

    pub fn format(mut self, format: SlideFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2SlidesError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(Pdf2SlidesError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.max_width == 0 || c.max_height == 0 {
            return Err(Pdf2SlidesError::InvalidConfig(
                "Maximum dimensions must be ≥ 1 pixel".into(),
            ));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(Pdf2SlidesError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        Ok(self.config)
    }
}
