//! # pdf2slides
//!
//! Convert an uploaded PDF presentation into optimized slide images and keep
//! the presentation's conversion state consistent across retries, partial
//! failures, reconversions, and deletes.
//!
//! ## Why this crate?
//!
//! Serving a PDF page-by-page in a browser is slow and fragile; presentation
//! viewers want plain images they can preload and flip through instantly.
//! This crate rasterises each page via pdfium at a fixed DPI, bounds every
//! image to a Full-HD frame with Lanczos resampling, and persists the result
//! as numbered, presentation-scoped slide blobs plus records — the data a
//! gallery or fullscreen presentation mode reads.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PresentationRecord (+ stored PDF blob)
//!  │
//!  ├─ 1. Load      fetch record, verify the source PDF still exists
//!  ├─ 2. Render    rasterise all pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Optimize  fit within 1920×1080, Lanczos3, flatten to RGB
//!  ├─ 4. Encode    PNG or JPEG (quality 85)
//!  ├─ 5. Persist   replace the slide set: blobs + records, best-effort
//!  └─ 6. Finalize  total_slides / is_converted / status in one update
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2slides::{
//!     create_presentation, BlobStore, ConversionConfig, PdfUpload, PresentationStore,
//!     SlidePipeline, UploadPolicy,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(PresentationStore::new());
//!     let blobs = Arc::new(BlobStore::new("./media"));
//!
//!     let record = create_presentation(
//!         &store,
//!         &blobs,
//!         &UploadPolicy::from_env(),
//!         PdfUpload {
//!             title: "Quarterly review".into(),
//!             filename: "review.pdf".into(),
//!             content_type: "application/pdf".into(),
//!             bytes: std::fs::read("review.pdf")?,
//!         },
//!     )
//!     .await?;
//!
//!     let pipeline = SlidePipeline::new(store, blobs, ConversionConfig::default());
//!     let outcome = pipeline.convert(record.id).await?;
//!     println!("{} slides from {} pages", outcome.slides_created, outcome.total_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure model
//!
//! A failure before the final record update marks the attempt `failed` and
//! leaves `is_converted`/`total_slides` at their prior values. A failure on
//! a *single* slide is logged and skipped — the attempt completes with a
//! reduced count. See [`error`] for the full taxonomy.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod progress;
pub mod query;
pub mod storage;
pub mod store;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, SlideFormat};
pub use convert::{ConversionOutcome, SlidePipeline};
pub use error::{Pdf2SlidesError, SlideError};
pub use model::{
    ImageBlob, PdfSource, PresentationId, PresentationRecord, ProcessingStatus, SlideId,
    SlideRecord,
};
pub use pipeline::render::{PageRasterizer, PdfiumRasterizer};
pub use progress::{ConversionProgress, NoopProgress, ProgressReporter};
pub use query::{
    conversion_status, navigate, ConversionStatus, OutOfRangePayload, SlideNavigation, SlideView,
};
pub use storage::BlobStore;
pub use store::PresentationStore;
pub use upload::{create_presentation, validate_title, PdfUpload, UploadPolicy};
