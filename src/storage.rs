//! Filesystem blob storage keyed by relative path.
//!
//! Blobs are written atomically (temp file + rename) so a crashed conversion
//! never leaves a half-written slide image behind, and deletes tolerate blobs
//! that are already gone — an already-released blob is success, not an error.
//! Writes are assumed durable and immediately consistent once they return.
//!
//! ## Path layout
//!
//! ```text
//! {root}/presentations/pdfs/{presentation_id}.pdf
//! {root}/presentations/slides/{presentation_id}/slide_{n:03}.{ext}
//! ```
//!
//! The layout is deterministic and presentation-scoped, so paths never
//! collide across presentations and a reconversion overwrites exactly the
//! slides it replaces.

use crate::config::SlideFormat;
use crate::error::Pdf2SlidesError;
use crate::model::PresentationId;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Blob-storage path of a presentation's source PDF.
pub fn pdf_blob_path(id: PresentationId) -> String {
    format!("presentations/pdfs/{id}.pdf")
}

/// Blob-storage path of one slide image.
pub fn slide_blob_path(id: PresentationId, slide_number: u32, format: SlideFormat) -> String {
    format!(
        "presentations/slides/{id}/slide_{slide_number:03}.{}",
        format.extension()
    )
}

/// Durable blob storage rooted at a directory.
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Absolute filesystem path of a blob.
    pub fn abs_path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Write a blob, creating parent directories as needed.
    ///
    /// Returns the number of bytes written.
    pub async fn put(&self, rel: &str, bytes: &[u8]) -> Result<u64, Pdf2SlidesError> {
        let path = self.abs_path(rel);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.storage_err(&path, e))?;
        }

        // Atomic write: temp file in the same directory, then rename.
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, bytes)
            .await
            .map_err(|e| self.storage_err(&path, e))?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| self.storage_err(&path, e))?;

        debug!("Wrote blob '{}' ({} bytes)", rel, bytes.len());
        Ok(bytes.len() as u64)
    }

    /// Read a blob's bytes.
    pub async fn read(&self, rel: &str) -> Result<Vec<u8>, Pdf2SlidesError> {
        let path = self.abs_path(rel);
        tokio::fs::read(&path)
            .await
            .map_err(|e| self.storage_err(&path, e))
    }

    /// Whether a blob exists at the given path.
    pub fn exists(&self, rel: &str) -> bool {
        self.abs_path(rel).is_file()
    }

    /// Delete a blob. A blob that is already missing is treated as released.
    pub async fn delete(&self, rel: &str) -> Result<(), Pdf2SlidesError> {
        let path = self.abs_path(rel);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted blob '{}'", rel);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Blob '{}' already missing, treating as released", rel);
                Ok(())
            }
            Err(e) => Err(self.storage_err(&path, e)),
        }
    }

    fn storage_err(&self, path: &Path, source: std::io::Error) -> Pdf2SlidesError {
        Pdf2SlidesError::Storage {
            path: path.to_path_buf(),
            source,
        }
    }
}
