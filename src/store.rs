//! In-memory record store for presentations and slides.
//!
//! Explicit repository functions on plain records replace the active-record
//! pattern: every mutation happens inside one `RwLock` write guard, which is
//! the transactional boundary for the multi-field updates the pipeline needs
//! (delete-old-slides, create-new-slides, update-presentation-fields).
//! `updated_at` is refreshed on every presentation mutation.
//!
//! The store holds records only; blob bytes live in
//! [`crate::storage::BlobStore`]. A SQL-backed store would implement the same
//! functions behind the same signatures.

use crate::error::Pdf2SlidesError;
use crate::model::{
    ImageBlob, PdfSource, PresentationId, PresentationRecord, ProcessingStatus, SlideId,
    SlideRecord,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

#[derive(Default)]
struct Tables {
    presentations: BTreeMap<u64, PresentationRecord>,
    slides: BTreeMap<u64, SlideRecord>,
}

/// Thread-safe record store.
///
/// Cheap to share via `Arc`; all methods take `&self`.
#[derive(Default)]
pub struct PresentationStore {
    tables: RwLock<Tables>,
    next_presentation_id: AtomicU64,
    next_slide_id: AtomicU64,
}

impl PresentationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a presentation record with status `Pending` and no slides.
    ///
    /// The caller is responsible for having validated `title` already
    /// (see [`crate::upload::validate_title`]).
    pub fn create_presentation(&self, title: impl Into<String>) -> PresentationRecord {
        let id = PresentationId(self.next_presentation_id.fetch_add(1, Ordering::SeqCst) + 1);
        let now = Utc::now();
        let record = PresentationRecord {
            id,
            title: title.into(),
            pdf: None,
            total_slides: 0,
            is_converted: false,
            processing_status: ProcessingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        let mut tables = self.write();
        tables.presentations.insert(id.0, record.clone());
        record
    }

    /// Fetch a presentation by id.
    pub fn get(&self, id: PresentationId) -> Result<PresentationRecord, Pdf2SlidesError> {
        self.read()
            .presentations
            .get(&id.0)
            .cloned()
            .ok_or(Pdf2SlidesError::PresentationNotFound { id })
    }

    /// Attach (or replace) the source PDF reference of a presentation.
    pub fn set_pdf(
        &self,
        id: PresentationId,
        pdf: PdfSource,
    ) -> Result<PresentationRecord, Pdf2SlidesError> {
        self.mutate(id, |rec| rec.pdf = Some(pdf))
    }

    /// Set the processing status of the most recent conversion attempt.
    ///
    /// Leaves `is_converted` and `total_slides` untouched: a failed attempt
    /// must not disturb what is durably stored from earlier passes.
    pub fn set_status(
        &self,
        id: PresentationId,
        status: ProcessingStatus,
    ) -> Result<PresentationRecord, Pdf2SlidesError> {
        self.mutate(id, |rec| rec.processing_status = status)
    }

    /// Finalize a conversion attempt: set `total_slides`, `is_converted`,
    /// and `processing_status = Completed` in one write.
    pub fn mark_converted(
        &self,
        id: PresentationId,
        total_slides: u32,
    ) -> Result<PresentationRecord, Pdf2SlidesError> {
        self.mutate(id, |rec| {
            rec.total_slides = total_slides;
            rec.is_converted = true;
            rec.processing_status = ProcessingStatus::Completed;
        })
    }

    /// Insert a slide record for a presentation.
    pub fn insert_slide(
        &self,
        presentation_id: PresentationId,
        slide_number: u32,
        image: ImageBlob,
    ) -> Result<SlideRecord, Pdf2SlidesError> {
        let mut tables = self.write();
        if !tables.presentations.contains_key(&presentation_id.0) {
            return Err(Pdf2SlidesError::PresentationNotFound {
                id: presentation_id,
            });
        }
        let id = SlideId(self.next_slide_id.fetch_add(1, Ordering::SeqCst) + 1);
        let record = SlideRecord {
            id,
            presentation_id,
            slide_number,
            image,
            created_at: Utc::now(),
        };
        tables.slides.insert(id.0, record.clone());
        Ok(record)
    }

    /// All slides of a presentation, ordered by slide number.
    pub fn slides_of(&self, id: PresentationId) -> Vec<SlideRecord> {
        let mut slides: Vec<SlideRecord> = self
            .read()
            .slides
            .values()
            .filter(|s| s.presentation_id == id)
            .cloned()
            .collect();
        slides.sort_by_key(|s| s.slide_number);
        slides
    }

    /// A single slide of a presentation by slide number.
    pub fn slide(&self, id: PresentationId, slide_number: u32) -> Option<SlideRecord> {
        self.read()
            .slides
            .values()
            .find(|s| s.presentation_id == id && s.slide_number == slide_number)
            .cloned()
    }

    /// Remove all slide records of a presentation, returning the removed
    /// records so the caller can release their blobs.
    pub fn delete_slides(&self, id: PresentationId) -> Vec<SlideRecord> {
        let mut tables = self.write();
        let doomed: Vec<u64> = tables
            .slides
            .values()
            .filter(|s| s.presentation_id == id)
            .map(|s| s.id.0)
            .collect();
        let mut removed = Vec::with_capacity(doomed.len());
        for key in doomed {
            if let Some(slide) = tables.slides.remove(&key) {
                removed.push(slide);
            }
        }
        removed.sort_by_key(|s| s.slide_number);
        removed
    }

    /// Remove a presentation and all its slide records, returning both so
    /// the caller can release the owned blobs.
    pub fn delete_presentation(
        &self,
        id: PresentationId,
    ) -> Result<(PresentationRecord, Vec<SlideRecord>), Pdf2SlidesError> {
        let mut tables = self.write();
        let record = tables
            .presentations
            .remove(&id.0)
            .ok_or(Pdf2SlidesError::PresentationNotFound { id })?;
        let doomed: Vec<u64> = tables
            .slides
            .values()
            .filter(|s| s.presentation_id == id)
            .map(|s| s.id.0)
            .collect();
        let mut slides = Vec::with_capacity(doomed.len());
        for key in doomed {
            if let Some(slide) = tables.slides.remove(&key) {
                slides.push(slide);
            }
        }
        slides.sort_by_key(|s| s.slide_number);
        Ok((record, slides))
    }

    fn mutate(
        &self,
        id: PresentationId,
        f: impl FnOnce(&mut PresentationRecord),
    ) -> Result<PresentationRecord, Pdf2SlidesError> {
        let mut tables = self.write();
        let rec = tables
            .presentations
            .get_mut(&id.0)
            .ok_or(Pdf2SlidesError::PresentationNotFound { id })?;
        f(rec);
        rec.updated_at = Utc::now();
        Ok(rec.clone())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(n: u32) -> ImageBlob {
        ImageBlob {
            path: format!("presentations/slides/1/slide_{n:03}.jpg"),
            size_bytes: 1024,
        }
    }

    #[test]
    fn create_and_get_roundtrip() {
        let store = PresentationStore::new();
        let rec = store.create_presentation("My deck");
        let fetched = store.get(rec.id).unwrap();
        assert_eq!(fetched.title, "My deck");
        assert_eq!(fetched.processing_status, ProcessingStatus::Pending);
        assert_eq!(fetched.total_slides, 0);
        assert!(!fetched.is_converted);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let store = PresentationStore::new();
        let err = store.get(PresentationId(42)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn mark_converted_updates_all_three_fields() {
        let store = PresentationStore::new();
        let rec = store.create_presentation("Deck");
        let updated = store.mark_converted(rec.id, 7).unwrap();
        assert_eq!(updated.total_slides, 7);
        assert!(updated.is_converted);
        assert_eq!(updated.processing_status, ProcessingStatus::Completed);
        assert!(updated.updated_at >= rec.updated_at);
    }

    #[test]
    fn set_status_leaves_conversion_fields_alone() {
        let store = PresentationStore::new();
        let rec = store.create_presentation("Deck");
        store.mark_converted(rec.id, 3).unwrap();
        let failed = store.set_status(rec.id, ProcessingStatus::Failed).unwrap();
        assert_eq!(failed.processing_status, ProcessingStatus::Failed);
        assert_eq!(failed.total_slides, 3);
        assert!(failed.is_converted);
    }

    #[test]
    fn slides_are_scoped_and_ordered() {
        let store = PresentationStore::new();
        let a = store.create_presentation("A");
        let b = store.create_presentation("B");
        store.insert_slide(a.id, 2, blob(2)).unwrap();
        store.insert_slide(a.id, 1, blob(1)).unwrap();
        store.insert_slide(b.id, 1, blob(1)).unwrap();

        let slides = store.slides_of(a.id);
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].slide_number, 1);
        assert_eq!(slides[1].slide_number, 2);
        assert_eq!(store.slides_of(b.id).len(), 1);
    }

    #[test]
    fn insert_slide_for_unknown_presentation_fails() {
        let store = PresentationStore::new();
        let err = store
            .insert_slide(PresentationId(9), 1, blob(1))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_presentation_cascades_to_slides() {
        let store = PresentationStore::new();
        let a = store.create_presentation("A");
        let b = store.create_presentation("B");
        store.insert_slide(a.id, 1, blob(1)).unwrap();
        store.insert_slide(a.id, 2, blob(2)).unwrap();
        store.insert_slide(b.id, 1, blob(1)).unwrap();

        let (removed, slides) = store.delete_presentation(a.id).unwrap();
        assert_eq!(removed.id, a.id);
        assert_eq!(slides.len(), 2);
        assert!(store.get(a.id).is_err());
        assert!(store.slides_of(a.id).is_empty());
        // Unrelated presentation untouched
        assert_eq!(store.slides_of(b.id).len(), 1);
    }

    #[test]
    fn delete_slides_returns_removed_records() {
        let store = PresentationStore::new();
        let a = store.create_presentation("A");
        store.insert_slide(a.id, 1, blob(1)).unwrap();
        store.insert_slide(a.id, 2, blob(2)).unwrap();

        let removed = store.delete_slides(a.id);
        assert_eq!(removed.len(), 2);
        assert!(store.slides_of(a.id).is_empty());
        // Idempotent on an empty set
        assert!(store.delete_slides(a.id).is_empty());
    }
}
