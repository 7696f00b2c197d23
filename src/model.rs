//! Durable data model: presentation and slide records.
//!
//! These are plain data records; all mutation goes through explicit functions
//! on [`crate::store::PresentationStore`] rather than methods on the records
//! themselves, keeping the transactional boundary in one place.
//!
//! ## Ownership
//!
//! A [`PresentationRecord`] exclusively owns its [`SlideRecord`]s and its PDF
//! blob; each slide exclusively owns its image blob. Deleting a presentation
//! releases every owned blob before the records disappear (a blob that is
//! already missing counts as released).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PresentationId(pub u64);

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Opaque identifier of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlideId(pub u64);

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Status of the most recent conversion attempt.
///
/// `Pending → InProgress → {Completed, Failed}`. A new attempt always starts
/// fresh; there is no mid-attempt resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::InProgress => "in_progress",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Reference to the stored source PDF of a presentation.
///
/// Immutable once conversion starts: reconversion replaces slides, never the
/// source (a re-upload attaches a fresh `PdfSource`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfSource {
    /// Blob-storage path, relative to the storage root.
    pub path: String,
    /// Size of the stored PDF in bytes.
    pub size_bytes: u64,
    /// Original filename as uploaded, for display.
    pub filename: String,
}

/// Reference to a stored slide image blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlob {
    /// Blob-storage path, relative to the storage root.
    pub path: String,
    /// Size of the encoded image in bytes.
    pub size_bytes: u64,
}

/// A user-uploaded document plus its derived conversion state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationRecord {
    pub id: PresentationId,
    /// Display title, trimmed, 3–200 characters.
    pub title: String,
    /// Stored source PDF, if one has been uploaded.
    pub pdf: Option<PdfSource>,
    /// Authoritative count of successfully produced slides.
    pub total_slides: u32,
    /// True once at least one conversion pass completed (even partially).
    pub is_converted: bool,
    pub processing_status: ProcessingStatus,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation.
    pub updated_at: DateTime<Utc>,
}

impl PresentationRecord {
    /// Original filename of the stored PDF, or `""` when none is attached.
    pub fn pdf_filename(&self) -> &str {
        self.pdf.as_ref().map(|p| p.filename.as_str()).unwrap_or("")
    }

    /// Size of the stored PDF in megabytes, rounded to 2 decimals.
    /// Returns 0.0 when no PDF is attached.
    pub fn pdf_size_mb(&self) -> f64 {
        self.pdf
            .as_ref()
            .map(|p| round2(p.size_bytes as f64 / (1024.0 * 1024.0)))
            .unwrap_or(0.0)
    }
}

/// One page of a presentation rendered as a standalone raster image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideRecord {
    pub id: SlideId,
    /// Owning presentation.
    pub presentation_id: PresentationId,
    /// 1-based position, unique within the presentation, in source-page order.
    pub slide_number: u32,
    pub image: ImageBlob,
    pub created_at: DateTime<Utc>,
}

impl SlideRecord {
    /// Size of the stored image in megabytes, rounded to 2 decimals.
    pub fn image_size_mb(&self) -> f64 {
        round2(self.image.size_bytes as f64 / (1024.0 * 1024.0))
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_pdf(size_bytes: u64) -> PresentationRecord {
        PresentationRecord {
            id: PresentationId(1),
            title: "Quarterly review".into(),
            pdf: Some(PdfSource {
                path: "presentations/pdfs/1.pdf".into(),
                size_bytes,
                filename: "review.pdf".into(),
            }),
            total_slides: 0,
            is_converted: false,
            processing_status: ProcessingStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn pdf_size_mb_rounds_to_two_decimals() {
        let rec = record_with_pdf(1_572_864); // 1.5 MB
        assert_eq!(rec.pdf_size_mb(), 1.5);

        let rec = record_with_pdf(1_234_567);
        assert_eq!(rec.pdf_size_mb(), 1.18);
    }

    #[test]
    fn no_pdf_means_zero_size_and_empty_filename() {
        let mut rec = record_with_pdf(100);
        rec.pdf = None;
        assert_eq!(rec.pdf_size_mb(), 0.0);
        assert_eq!(rec.pdf_filename(), "");
    }

    #[test]
    fn processing_status_serializes_snake_case() {
        let s = serde_json::to_string(&ProcessingStatus::InProgress).unwrap();
        assert_eq!(s, "\"in_progress\"");
        assert_eq!(ProcessingStatus::Completed.to_string(), "completed");
    }
}
