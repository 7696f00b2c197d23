//! Pipeline stages for PDF-to-slides conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap the rendering
//! backend without touching persistence.
//!
//! ## Data Flow
//!
//! ```text
//! render ──▶ optimize ──▶ persist
//! (pdfium)   (fit+encode) (blobs + records)
//! ```
//!
//! 1. [`render`]   — rasterise every page at a fixed DPI; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 2. [`optimize`] — fit each page within the configured bounds and encode
//!    to PNG/JPEG
//! 3. [`persist`]  — replace the presentation's slide set: blobs plus
//!    records, best-effort per slide

pub mod optimize;
pub mod persist;
pub mod render;
