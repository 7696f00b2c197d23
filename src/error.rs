//! Error types for the pdf2slides library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Pdf2SlidesError`] — **Fatal**: the conversion attempt (or the calling
//!   operation) cannot proceed — bad upload input, unknown presentation,
//!   missing source PDF, corrupt document, storage breakdown. Returned as
//!   `Err(Pdf2SlidesError)` from the public entry points.
//!
//! * [`SlideError`] — **Non-fatal**: a single slide failed to encode or
//!   persist. The pipeline logs it, counts it, and continues with the
//!   remaining slides; the attempt still completes with a reduced slide
//!   count. One corrupt page must never cost the caller every other page.
//!
//! Validation errors (the `InvalidTitle`/`FileTooLarge` family) are raised
//! before any record or blob is touched, so rejecting an upload never leaves
//! side effects behind.

use crate::model::PresentationId;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2slides library.
///
/// Per-slide failures use [`SlideError`] and never surface here.
#[derive(Debug, Error)]
pub enum Pdf2SlidesError {
    // ── Upload validation ─────────────────────────────────────────────────
    /// Title failed the 3–200 character rule (after trimming).
    #[error("Invalid title: {reason}")]
    InvalidTitle { reason: String },

    /// Uploaded file does not carry a `.pdf` extension.
    #[error("Only PDF files are accepted, got '{filename}'")]
    NotAPdfExtension { filename: String },

    /// Declared content type is not `application/pdf`.
    #[error("Unsupported content type '{content_type}', expected application/pdf")]
    UnsupportedContentType { content_type: String },

    /// Uploaded file exceeds the configured size limit.
    #[error("File too large: {size_bytes} bytes (maximum {max_bytes} bytes)")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    /// The upload was named and typed like a PDF but is not one.
    #[error("File '{filename}' is not a valid PDF. First bytes: {magic:?}")]
    NotAPdf { filename: String, magic: [u8; 4] },

    // ── Not found ─────────────────────────────────────────────────────────
    /// No presentation record exists for the given id.
    #[error("Presentation {id} not found")]
    PresentationNotFound { id: PresentationId },

    /// `total_slides` says the slide should exist, but its record is gone.
    /// This is a data-integrity gap and is surfaced, never defaulted.
    #[error("Slide {slide_number} of presentation {presentation_id} not found")]
    SlideNotFound {
        presentation_id: PresentationId,
        slide_number: u32,
    },

    // ── Conversion (attempt-fatal) ────────────────────────────────────────
    /// The presentation record has no source PDF attached.
    #[error("Presentation {id} has no PDF file attached")]
    MissingSource { id: PresentationId },

    /// The record references a PDF blob that is no longer in storage
    /// (external deletion or a lost race).
    #[error("Source PDF for presentation {id} is missing from storage: '{path}'")]
    SourceGone { id: PresentationId, path: String },

    /// The PDF could not be opened or parsed by the rendering backend.
    #[error("PDF '{path}' could not be read: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// The rendering backend failed on a specific page. Fatal for the whole
    /// attempt: a rasterization failure yields no partial page set.
    #[error("Rasterisation failed for page {page} of '{path}': {detail}")]
    RasterisationFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    /// The document opened cleanly but produced zero pages.
    #[error("No pages could be extracted from '{path}'")]
    EmptyDocument { path: PathBuf },

    // ── Infrastructure ────────────────────────────────────────────────────
    /// Blob storage read/write/delete failed.
    #[error("Storage error at '{path}': {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2SlidesError {
    /// True for upload-validation failures, which by contract occur before
    /// any record or blob mutation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTitle { .. }
                | Self::NotAPdfExtension { .. }
                | Self::UnsupportedContentType { .. }
                | Self::FileTooLarge { .. }
                | Self::NotAPdf { .. }
        )
    }

    /// True for the not-found family (distinct outcome for API collaborators).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PresentationNotFound { .. } | Self::SlideNotFound { .. }
        )
    }
}

/// A non-fatal error for a single slide.
///
/// Logged and counted by the slide repository; the conversion attempt
/// continues with the remaining slides.
#[derive(Debug, Clone, Error)]
pub enum SlideError {
    /// Encoding the optimized image to PNG/JPEG bytes failed.
    #[error("Slide {slide_number}: image encoding failed: {detail}")]
    EncodeFailed { slide_number: u32, detail: String },

    /// Writing the encoded image blob to storage failed.
    #[error("Slide {slide_number}: failed to write '{path}': {detail}")]
    WriteFailed {
        slide_number: u32,
        path: String,
        detail: String,
    },
}
