//! Slide persistence: replace a presentation's slide set and release blobs.
//!
//! Reconversion is a full replace, never a merge: the old slide records and
//! their image blobs go first, then the new set is written in source-page
//! order. Persisting each slide is **best-effort** — a failure on one page is
//! logged and skipped so a single corrupt page cannot sacrifice the rest of
//! the deck. The final slide count reflects only the slides that succeeded.

use crate::config::ConversionConfig;
use crate::error::{Pdf2SlidesError, SlideError};
use crate::model::{ImageBlob, PresentationId, PresentationRecord, SlideRecord};
use crate::pipeline::optimize;
use crate::progress::ConversionProgress;
use crate::storage::{slide_blob_path, BlobStore};
use crate::store::PresentationStore;
use image::DynamicImage;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Manages the lifecycle of derived slide artifacts for a presentation.
pub struct SlideRepository {
    store: Arc<PresentationStore>,
    blobs: Arc<BlobStore>,
}

impl SlideRepository {
    pub fn new(store: Arc<PresentationStore>, blobs: Arc<BlobStore>) -> Self {
        Self { store, blobs }
    }

    /// Replace all slides of `presentation` with one slide per input image.
    ///
    /// Images are processed in order; slide numbers are their 1-based
    /// positions. Returns the records actually created, in slide_number
    /// order. Per-slide failures are reported through `progress` and
    /// swallowed.
    pub async fn replace_slides(
        &self,
        presentation: &PresentationRecord,
        images: &[DynamicImage],
        config: &ConversionConfig,
        progress: &dyn ConversionProgress,
    ) -> Result<Vec<SlideRecord>, Pdf2SlidesError> {
        self.delete_existing(presentation.id).await;

        let total = images.len();
        let mut created = Vec::with_capacity(total);

        for (i, image) in images.iter().enumerate() {
            let slide_number = (i + 1) as u32;
            progress.on_slide_start(slide_number as usize, total);

            match self
                .persist_one(presentation.id, slide_number, image, config)
                .await
            {
                Ok(record) => {
                    progress.on_slide_complete(
                        slide_number as usize,
                        total,
                        record.image.size_bytes as usize,
                    );
                    created.push(record);
                }
                Err(e) => {
                    // Best-effort: skip the failed slide, keep the rest.
                    error!("{}", e);
                    progress.on_slide_error(slide_number as usize, total, &e.to_string());
                }
            }
        }

        info!(
            "Persisted {}/{} slides for presentation {}",
            created.len(),
            total,
            presentation.id
        );
        Ok(created)
    }

    async fn persist_one(
        &self,
        presentation_id: PresentationId,
        slide_number: u32,
        image: &DynamicImage,
        config: &ConversionConfig,
    ) -> Result<SlideRecord, SlideError> {
        let optimized = optimize::fit_within(image.clone(), config.max_width, config.max_height);
        let bytes = optimize::encode(&optimized, config.format, config.jpeg_quality, slide_number)?;

        let path = slide_blob_path(presentation_id, slide_number, config.format);
        let size_bytes =
            self.blobs
                .put(&path, &bytes)
                .await
                .map_err(|e| SlideError::WriteFailed {
                    slide_number,
                    path: path.clone(),
                    detail: e.to_string(),
                })?;

        let record = self
            .store
            .insert_slide(presentation_id, slide_number, ImageBlob { path: path.clone(), size_bytes })
            .map_err(|e| SlideError::WriteFailed {
                slide_number,
                path,
                detail: e.to_string(),
            })?;

        debug!("Slide {} created: {}", slide_number, record.image.path);
        Ok(record)
    }

    /// Delete existing slide records and their blobs.
    ///
    /// Blob deletion failures are logged, not propagated: the records are
    /// already gone and the replacement set will overwrite the paths that
    /// matter.
    async fn delete_existing(&self, id: PresentationId) {
        let removed = self.store.delete_slides(id);
        if removed.is_empty() {
            return;
        }
        info!("Deleting {} existing slides of presentation {}", removed.len(), id);
        for slide in &removed {
            if let Err(e) = self.blobs.delete(&slide.image.path).await {
                warn!("Failed to delete stale slide blob: {}", e);
            }
        }
    }

    /// Delete a presentation, its slides, and every owned blob.
    ///
    /// Blobs are released before the records disappear; a blob that is
    /// already missing is treated as released.
    pub async fn delete_presentation(
        &self,
        id: PresentationId,
    ) -> Result<(), Pdf2SlidesError> {
        let (record, slides) = self.store.delete_presentation(id)?;

        for slide in &slides {
            self.blobs.delete(&slide.image.path).await?;
        }
        if let Some(pdf) = &record.pdf {
            self.blobs.delete(&pdf.path).await?;
        }

        info!(
            "Deleted presentation {} ('{}') with {} slides",
            id,
            record.title,
            slides.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgress;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn page(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([10, 20, 30])))
    }

    fn setup() -> (TempDir, Arc<PresentationStore>, Arc<BlobStore>, SlideRepository) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(PresentationStore::new());
        let blobs = Arc::new(BlobStore::new(dir.path()));
        let repo = SlideRepository::new(Arc::clone(&store), Arc::clone(&blobs));
        (dir, store, blobs, repo)
    }

    #[tokio::test]
    async fn replace_creates_numbered_slides_in_order() {
        let (_dir, store, blobs, repo) = setup();
        let rec = store.create_presentation("Deck");
        let images = vec![page(100, 80), page(100, 80), page(100, 80)];

        let created = repo
            .replace_slides(&rec, &images, &ConversionConfig::default(), &NoopProgress)
            .await
            .unwrap();

        assert_eq!(created.len(), 3);
        let numbers: Vec<u32> = created.iter().map(|s| s.slide_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        for slide in &created {
            assert!(blobs.exists(&slide.image.path), "missing {}", slide.image.path);
            assert!(slide.image.size_bytes > 0);
        }
    }

    #[tokio::test]
    async fn replace_removes_prior_slides_and_blobs() {
        let (_dir, store, blobs, repo) = setup();
        let rec = store.create_presentation("Deck");
        let config = ConversionConfig::default();

        let first = repo
            .replace_slides(&rec, &vec![page(50, 50); 3], &config, &NoopProgress)
            .await
            .unwrap();
        assert_eq!(first.len(), 3);
        let stale_path = first[2].image.path.clone();

        // Second pass has fewer pages; slide 3's record and blob must go.
        let second = repo
            .replace_slides(&rec, &vec![page(50, 50); 2], &config, &NoopProgress)
            .await
            .unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(store.slides_of(rec.id).len(), 2);
        assert!(!blobs.exists(&stale_path), "stale blob survived: {stale_path}");
    }

    #[tokio::test]
    async fn one_failed_slide_does_not_abort_the_batch() {
        let (dir, store, _blobs, repo) = setup();
        let rec = store.create_presentation("Deck");
        let config = ConversionConfig::default();

        // Occupy slide 2's blob path with a directory so the write fails.
        let clogged = dir
            .path()
            .join(slide_blob_path(rec.id, 2, config.format));
        std::fs::create_dir_all(&clogged).unwrap();

        let created = repo
            .replace_slides(&rec, &vec![page(40, 40); 3], &config, &NoopProgress)
            .await
            .unwrap();

        // Best-effort policy: slides 1 and 3 survive the failure of slide 2.
        assert_eq!(created.len(), 2);
        let numbers: Vec<u32> = created.iter().map(|s| s.slide_number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }

    #[tokio::test]
    async fn delete_presentation_releases_all_blobs() {
        let (_dir, store, blobs, repo) = setup();
        let rec = store.create_presentation("Deck");
        store
            .set_pdf(
                rec.id,
                crate::model::PdfSource {
                    path: crate::storage::pdf_blob_path(rec.id),
                    size_bytes: 4,
                    filename: "deck.pdf".into(),
                },
            )
            .unwrap();
        blobs
            .put(&crate::storage::pdf_blob_path(rec.id), b"%PDF")
            .await
            .unwrap();
        let rec = store.get(rec.id).unwrap();

        let created = repo
            .replace_slides(&rec, &vec![page(30, 30); 2], &ConversionConfig::default(), &NoopProgress)
            .await
            .unwrap();
        let slide_paths: Vec<String> = created.iter().map(|s| s.image.path.clone()).collect();

        repo.delete_presentation(rec.id).await.unwrap();

        assert!(store.get(rec.id).is_err());
        for p in &slide_paths {
            assert!(!blobs.exists(p));
        }
        assert!(!blobs.exists(&crate::storage::pdf_blob_path(rec.id)));
    }

    #[tokio::test]
    async fn delete_presentation_tolerates_missing_blobs() {
        let (_dir, store, _blobs, repo) = setup();
        let rec = store.create_presentation("Deck");
        // Slide record points at a blob that was never written.
        store
            .insert_slide(
                rec.id,
                1,
                ImageBlob {
                    path: "presentations/slides/1/slide_001.jpg".into(),
                    size_bytes: 100,
                },
            )
            .unwrap();

        repo.delete_presentation(rec.id).await.unwrap();
        assert!(store.get(rec.id).is_err());
    }
}
