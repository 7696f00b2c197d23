//! Conversion pipeline: orchestrates rasterization → optimization →
//! persistence → status update for one presentation.
//!
//! A conversion attempt is a sequential run of blocking steps — file I/O,
//! rasterization, encoding, storage writes, record writes — with no internal
//! concurrency; pages are processed one at a time, in order, to bound peak
//! memory. The pipeline owns no scheduling: callers run [`SlidePipeline::convert`]
//! inline or hand it to whatever task runner they use, injecting a
//! [`ConversionProgress`] reporter for live updates.
//!
//! ## Failure policy
//!
//! One policy for every invocation path: any failure before the final record
//! update marks `processing_status = Failed` and propagates the error, while
//! `is_converted` and `total_slides` keep their prior values. Per-slide
//! persistence failures are not attempt failures — the attempt completes with
//! a reduced count (see [`crate::pipeline::persist`]).
//!
//! Re-invoking `convert` on the same presentation is safe: it always
//! re-rasterizes and fully replaces the prior slide set, so the output is
//! idempotent even though the work is redone. Concurrent attempts on the same
//! presentation are not mutually excluded; the last writer wins.

use crate::config::ConversionConfig;
use crate::error::Pdf2SlidesError;
use crate::model::{PresentationId, PresentationRecord, ProcessingStatus};
use crate::pipeline::persist::SlideRepository;
use crate::pipeline::render::{self, PageRasterizer, PdfiumRasterizer};
use crate::progress::{ConversionProgress, NoopProgress};
use crate::storage::BlobStore;
use crate::store::PresentationStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome summary of a completed conversion attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub presentation_id: PresentationId,
    pub title: String,
    /// Slides actually persisted (≤ `total_pages` under per-slide failures).
    pub slides_created: usize,
    /// Raster pages produced from the source document.
    pub total_pages: usize,
    pub status: ProcessingStatus,
}

/// The conversion pipeline and its collaborators.
///
/// Cheap to share via `Arc`; one instance serves any number of conversion
/// attempts.
pub struct SlidePipeline {
    store: Arc<PresentationStore>,
    blobs: Arc<BlobStore>,
    slides: SlideRepository,
    rasterizer: Arc<dyn PageRasterizer>,
    config: ConversionConfig,
}

impl SlidePipeline {
    /// Build a pipeline with the pdfium rasterizer at the configured DPI.
    pub fn new(
        store: Arc<PresentationStore>,
        blobs: Arc<BlobStore>,
        config: ConversionConfig,
    ) -> Self {
        let rasterizer: Arc<dyn PageRasterizer> = Arc::new(PdfiumRasterizer::new(config.dpi));
        Self::with_rasterizer(store, blobs, config, rasterizer)
    }

    /// Build a pipeline with a caller-supplied rendering backend.
    pub fn with_rasterizer(
        store: Arc<PresentationStore>,
        blobs: Arc<BlobStore>,
        config: ConversionConfig,
        rasterizer: Arc<dyn PageRasterizer>,
    ) -> Self {
        let slides = SlideRepository::new(Arc::clone(&store), Arc::clone(&blobs));
        Self {
            store,
            blobs,
            slides,
            rasterizer,
            config,
        }
    }

    /// Convert a presentation's PDF into slides, without progress events.
    pub async fn convert(
        &self,
        id: PresentationId,
    ) -> Result<ConversionOutcome, Pdf2SlidesError> {
        self.convert_with_progress(id, &NoopProgress).await
    }

    /// Convert a presentation's PDF into slides.
    ///
    /// # Errors
    /// * [`Pdf2SlidesError::PresentationNotFound`] — unknown id (no status
    ///   change, there is no record to mark)
    /// * [`Pdf2SlidesError::MissingSource`] / [`Pdf2SlidesError::SourceGone`]
    ///   — no usable PDF; the attempt is marked `Failed`
    /// * rasterization and storage errors — the attempt is marked `Failed`
    pub async fn convert_with_progress(
        &self,
        id: PresentationId,
        progress: &dyn ConversionProgress,
    ) -> Result<ConversionOutcome, Pdf2SlidesError> {
        let record = self.store.get(id)?;
        info!("Starting conversion of presentation {} ('{}')", id, record.title);

        // Fresh attempt: pending → in_progress.
        self.store.set_status(id, ProcessingStatus::InProgress)?;

        match self.run_attempt(&record, progress).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                error!("Conversion of presentation {} failed: {}", id, e);
                if let Err(status_err) = self.store.set_status(id, ProcessingStatus::Failed) {
                    warn!("Could not mark presentation {} as failed: {}", id, status_err);
                }
                Err(e)
            }
        }
    }

    /// Synchronous wrapper around [`convert`](Self::convert).
    ///
    /// Creates a temporary tokio runtime internally; blocks the caller for
    /// the full duration of the attempt.
    pub fn convert_sync(&self, id: PresentationId) -> Result<ConversionOutcome, Pdf2SlidesError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| Pdf2SlidesError::Internal(format!("Failed to create tokio runtime: {e}")))?
            .block_on(self.convert(id))
    }

    async fn run_attempt(
        &self,
        record: &PresentationRecord,
        progress: &dyn ConversionProgress,
    ) -> Result<ConversionOutcome, Pdf2SlidesError> {
        let source = record
            .pdf
            .as_ref()
            .ok_or(Pdf2SlidesError::MissingSource { id: record.id })?;

        // The blob may have been deleted externally since upload.
        if !self.blobs.exists(&source.path) {
            return Err(Pdf2SlidesError::SourceGone {
                id: record.id,
                path: source.path.clone(),
            });
        }

        let pdf_path = self.blobs.abs_path(&source.path);
        let images = render::rasterize_pages(Arc::clone(&self.rasterizer), pdf_path.clone()).await?;
        if images.is_empty() {
            return Err(Pdf2SlidesError::EmptyDocument { path: pdf_path });
        }

        let total_pages = images.len();
        info!("Rasterized {} pages for presentation {}", total_pages, record.id);
        progress.on_conversion_start(total_pages);

        let created = self
            .slides
            .replace_slides(record, &images, &self.config, progress)
            .await?;

        // Single atomic update: total_slides + is_converted + status.
        // Partial success is still a completed attempt.
        self.store.mark_converted(record.id, created.len() as u32)?;
        progress.on_conversion_complete(total_pages, created.len());

        info!(
            "Conversion complete: {}/{} slides for presentation {}",
            created.len(),
            total_pages,
            record.id
        );

        Ok(ConversionOutcome {
            presentation_id: record.id,
            title: record.title.clone(),
            slides_created: created.len(),
            total_pages,
            status: ProcessingStatus::Completed,
        })
    }

    /// Delete a presentation, its slides, and every owned blob.
    pub async fn delete_presentation(&self, id: PresentationId) -> Result<(), Pdf2SlidesError> {
        self.slides.delete_presentation(id).await
    }

    /// The record store this pipeline reads and writes.
    pub fn store(&self) -> &Arc<PresentationStore> {
        &self.store
    }

    /// The blob store this pipeline reads and writes.
    pub fn blobs(&self) -> &Arc<BlobStore> {
        &self.blobs
    }

    /// The conversion configuration in effect.
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}
