//! PDF rasterization: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async contexts.
//! `tokio::task::spawn_blocking` moves the work onto a dedicated thread pool
//! thread so the Tokio workers never stall during CPU-heavy rendering.
//!
//! ## Rasterizer seam
//!
//! [`PageRasterizer`] is the trait boundary around the rendering backend.
//! Production uses [`PdfiumRasterizer`]; tests inject a synthetic rasterizer
//! so the rest of the pipeline can run without a pdfium binary.

use crate::error::Pdf2SlidesError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Renders a PDF into one raster image per page, in document order.
///
/// Each call re-rasterizes from the source; the produced sequence is finite
/// and not resumable mid-stream. A whole-document failure returns an error
/// and no pages.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<DynamicImage>, Pdf2SlidesError>;
}

/// pdfium-backed rasterizer at a fixed DPI, all pages, no page-range
/// restriction.
pub struct PdfiumRasterizer {
    dpi: u32,
}

impl PdfiumRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(&self, pdf_path: &Path) -> Result<Vec<DynamicImage>, Pdf2SlidesError> {
        let pdfium = Pdfium::default();

        let document =
            pdfium
                .load_pdf_from_file(pdf_path, None)
                .map_err(|e| Pdf2SlidesError::CorruptPdf {
                    path: pdf_path.to_path_buf(),
                    detail: format!("{e:?}"),
                })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        info!("PDF loaded: {} pages", total_pages);

        let mut results = Vec::with_capacity(total_pages);

        for idx in 0..total_pages {
            let page = pages
                .get(idx as u16)
                .map_err(|e| Pdf2SlidesError::RasterisationFailed {
                    path: pdf_path.to_path_buf(),
                    page: idx + 1,
                    detail: format!("{e:?}"),
                })?;

            // Pixel width from the page's physical width in points.
            let target_width = (page.width().value * self.dpi as f32 / 72.0) as i32;
            let render_config = PdfRenderConfig::new().set_target_width(target_width.max(1));

            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                Pdf2SlidesError::RasterisationFailed {
                    path: pdf_path.to_path_buf(),
                    page: idx + 1,
                    detail: format!("{e:?}"),
                }
            })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );

            results.push(image);
        }

        Ok(results)
    }
}

/// Rasterize all pages of a PDF on the blocking thread pool.
pub async fn rasterize_pages(
    rasterizer: Arc<dyn PageRasterizer>,
    pdf_path: PathBuf,
) -> Result<Vec<DynamicImage>, Pdf2SlidesError> {
    tokio::task::spawn_blocking(move || rasterizer.rasterize(&pdf_path))
        .await
        .map_err(|e| Pdf2SlidesError::Internal(format!("Render task panicked: {e}")))?
}
