//! Slide image optimization: bound the dimensions, then encode.
//!
//! Resizing uses Lanczos3 — rendered slide text survives downsampling with a
//! windowed-sinc filter; nearest-neighbour or box filters shred thin glyph
//! strokes. An image already within bounds is returned as-is, with no
//! re-sampling or re-encode detour, so converting an already-small deck is
//! lossless up to the final format encode.

use crate::config::SlideFormat;
use crate::error::SlideError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// Fit an image within `max_width` × `max_height`, preserving aspect ratio.
///
/// Returns the input unchanged when both dimensions are already within
/// bounds. Otherwise applies the single uniform scale factor
/// `min(max_width/width, max_height/height)`.
pub fn fit_within(image: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if width <= max_width && height <= max_height {
        return image;
    }

    let width_ratio = max_width as f64 / width as f64;
    let height_ratio = max_height as f64 / height as f64;
    let ratio = width_ratio.min(height_ratio);

    let new_width = ((width as f64 * ratio) as u32).max(1);
    let new_height = ((height as f64 * ratio) as u32).max(1);

    debug!(
        "Resizing slide {}x{} → {}x{}",
        width, height, new_width, new_height
    );
    image.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

/// Encode an image for storage.
///
/// Transparency is flattened to opaque RGB before encoding; `jpeg_quality`
/// applies only to the lossy format.
pub fn encode(
    image: &DynamicImage,
    format: SlideFormat,
    jpeg_quality: u8,
    slide_number: u32,
) -> Result<Vec<u8>, SlideError> {
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buf = Vec::new();

    let result = match format {
        SlideFormat::Png => rgb.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png),
        SlideFormat::Jpeg => {
            let mut cursor = Cursor::new(&mut buf);
            let encoder = JpegEncoder::new_with_quality(&mut cursor, jpeg_quality);
            rgb.write_with_encoder(encoder)
        }
    };

    result.map_err(|e| SlideError::EncodeFailed {
        slide_number,
        detail: e.to_string(),
    })?;

    debug!(
        "Encoded slide {} → {} bytes ({})",
        slide_number,
        buf.len(),
        format.mime_type()
    );
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn solid(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([120, 30, 200])))
    }

    #[test]
    fn within_bounds_is_a_noop() {
        let img = solid(800, 600);
        let out = fit_within(img.clone(), 1920, 1080);
        assert_eq!((out.width(), out.height()), (800, 600));
        assert_eq!(out.as_bytes(), img.as_bytes());
    }

    #[test]
    fn exact_bounds_are_still_a_noop() {
        let out = fit_within(solid(1920, 1080), 1920, 1080);
        assert_eq!((out.width(), out.height()), (1920, 1080));
    }

    #[test]
    fn oversized_image_fits_both_axes_and_keeps_ratio() {
        let out = fit_within(solid(2400, 1800), 1920, 1080);
        assert!(out.width() <= 1920);
        assert!(out.height() <= 1080);

        let original_ratio = 2400.0 / 1800.0;
        let new_ratio = out.width() as f64 / out.height() as f64;
        let drift = (new_ratio - original_ratio).abs() / original_ratio;
        assert!(drift < 0.01, "aspect ratio drifted by {drift}");
        // Height is the binding constraint for 4:3 against a 16:9 box.
        assert_eq!(out.height(), 1080);
    }

    #[test]
    fn wide_image_is_bound_by_width() {
        let out = fit_within(solid(4000, 1000), 1920, 1080);
        assert_eq!(out.width(), 1920);
        assert!(out.height() <= 1080);
    }

    #[test]
    fn encode_png_roundtrips() {
        let bytes = encode(&solid(10, 10), SlideFormat::Png, 85, 1).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (10, 10));
    }

    #[test]
    fn encode_jpeg_produces_decodable_bytes() {
        let bytes = encode(&solid(64, 48), SlideFormat::Jpeg, 85, 1).unwrap();
        assert!(!bytes.is_empty());
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[test]
    fn transparency_is_flattened_before_encoding() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 0])));
        let bytes = encode(&rgba, SlideFormat::Jpeg, 85, 1).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        // JPEG has no alpha channel; decode must succeed as opaque RGB.
        assert_eq!(decoded.color().channel_count(), 3);
    }
}
