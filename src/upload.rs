//! Upload validation and presentation creation.
//!
//! The HTTP form handling itself lives with the web collaborator; this
//! module is the contract it calls into. Validation runs before any record
//! or blob is touched, so a rejected upload has no side effects. A valid
//! upload produces a `Pending` presentation record with its PDF stored under
//! the presentation-scoped blob path — converting it is a separate,
//! explicitly invoked step (inline or via a task runner).

use crate::error::Pdf2SlidesError;
use crate::model::{PdfSource, PresentationRecord};
use crate::storage::{pdf_blob_path, BlobStore};
use crate::store::PresentationStore;
use tracing::{info, warn};

/// Default maximum upload size: 50 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Env var overriding the maximum upload size, in whole megabytes.
pub const MAX_UPLOAD_ENV: &str = "PDF2SLIDES_MAX_UPLOAD_MB";

const MIN_TITLE_CHARS: usize = 3;
const MAX_TITLE_CHARS: usize = 200;

/// Upload acceptance policy.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Maximum accepted PDF size in bytes.
    pub max_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl UploadPolicy {
    /// Policy with the size limit taken from `PDF2SLIDES_MAX_UPLOAD_MB`
    /// when set and parseable, else the 50 MB default.
    pub fn from_env() -> Self {
        let max_bytes = std::env::var(MAX_UPLOAD_ENV)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(|mb| mb * 1024 * 1024)
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        Self { max_bytes }
    }
}

/// An uploaded PDF as received from the form collaborator.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    /// Raw title as typed by the user; trimmed and validated here.
    pub title: String,
    /// Original filename of the upload.
    pub filename: String,
    /// Declared content type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Validate and normalize a presentation title.
///
/// Trims surrounding whitespace, then requires 3–200 characters.
pub fn validate_title(raw: &str) -> Result<String, Pdf2SlidesError> {
    let title = raw.trim();
    let chars = title.chars().count();
    if chars < MIN_TITLE_CHARS {
        return Err(Pdf2SlidesError::InvalidTitle {
            reason: format!("must be at least {MIN_TITLE_CHARS} characters"),
        });
    }
    if chars > MAX_TITLE_CHARS {
        return Err(Pdf2SlidesError::InvalidTitle {
            reason: format!("must be at most {MAX_TITLE_CHARS} characters"),
        });
    }
    Ok(title.to_string())
}

fn validate_pdf(upload: &PdfUpload, policy: &UploadPolicy) -> Result<(), Pdf2SlidesError> {
    if !upload.filename.to_lowercase().ends_with(".pdf") {
        return Err(Pdf2SlidesError::NotAPdfExtension {
            filename: upload.filename.clone(),
        });
    }
    if upload.content_type != "application/pdf" {
        return Err(Pdf2SlidesError::UnsupportedContentType {
            content_type: upload.content_type.clone(),
        });
    }
    let size = upload.bytes.len() as u64;
    if size > policy.max_bytes {
        return Err(Pdf2SlidesError::FileTooLarge {
            size_bytes: size,
            max_bytes: policy.max_bytes,
        });
    }
    // Magic-byte check catches renamed non-PDFs before pdfium ever sees them.
    let mut magic = [0u8; 4];
    let head = upload.bytes.get(..4).unwrap_or(&[]);
    magic[..head.len()].copy_from_slice(head);
    if &magic != b"%PDF" {
        return Err(Pdf2SlidesError::NotAPdf {
            filename: upload.filename.clone(),
            magic,
        });
    }
    Ok(())
}

/// Validate an upload, create its presentation record, and store the PDF.
///
/// On a storage failure the freshly created record is rolled back so no
/// orphan presentation is left behind.
pub async fn create_presentation(
    store: &PresentationStore,
    blobs: &BlobStore,
    policy: &UploadPolicy,
    upload: PdfUpload,
) -> Result<PresentationRecord, Pdf2SlidesError> {
    let title = validate_title(&upload.title)?;
    validate_pdf(&upload, policy)?;

    let record = store.create_presentation(title);
    let path = pdf_blob_path(record.id);

    let size_bytes = match blobs.put(&path, &upload.bytes).await {
        Ok(size) => size,
        Err(e) => {
            warn!("Rolling back presentation {} after storage failure", record.id);
            if let Err(del_err) = store.delete_presentation(record.id) {
                warn!("Rollback failed: {}", del_err);
            }
            return Err(e);
        }
    };

    let record = store.set_pdf(
        record.id,
        PdfSource {
            path,
            size_bytes,
            filename: upload.filename,
        },
    )?;

    info!(
        "Created presentation {} ('{}', {:.2} MB)",
        record.id,
        record.title,
        record.pdf_size_mb()
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_upload() -> PdfUpload {
        PdfUpload {
            title: "  Team offsite deck  ".into(),
            filename: "offsite.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: b"%PDF-1.7 fake body".to_vec(),
        }
    }

    #[test]
    fn title_is_trimmed() {
        assert_eq!(validate_title("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn title_too_short_after_trim_is_rejected() {
        let err = validate_title("  ab ").unwrap_err();
        assert!(err.is_validation());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn title_over_200_chars_is_rejected() {
        let long = "x".repeat(201);
        assert!(validate_title(&long).is_err());
        assert!(validate_title(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let mut up = pdf_upload();
        up.filename = "deck.pptx".into();
        let err = validate_pdf(&up, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::NotAPdfExtension { .. }));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        let mut up = pdf_upload();
        up.filename = "DECK.PDF".into();
        assert!(validate_pdf(&up, &UploadPolicy::default()).is_ok());
    }

    #[test]
    fn wrong_content_type_is_rejected() {
        let mut up = pdf_upload();
        up.content_type = "application/zip".into();
        let err = validate_pdf(&up, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::UnsupportedContentType { .. }));
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let up = pdf_upload();
        let policy = UploadPolicy { max_bytes: 4 };
        let err = validate_pdf(&up, &policy).unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::FileTooLarge { .. }));
    }

    #[test]
    fn renamed_non_pdf_is_rejected_by_magic_bytes() {
        let mut up = pdf_upload();
        up.bytes = b"PK\x03\x04 actually a zip".to_vec();
        let err = validate_pdf(&up, &UploadPolicy::default()).unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::NotAPdf { .. }));
    }

    #[tokio::test]
    async fn create_presentation_stores_blob_and_pdf_source() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = PresentationStore::new();
        let blobs = BlobStore::new(dir.path());

        let record = create_presentation(&store, &blobs, &UploadPolicy::default(), pdf_upload())
            .await
            .unwrap();

        assert_eq!(record.title, "Team offsite deck");
        let pdf = record.pdf.as_ref().unwrap();
        assert_eq!(pdf.filename, "offsite.pdf");
        assert!(blobs.exists(&pdf.path));
        assert_eq!(record.pdf_filename(), "offsite.pdf");
        assert_eq!(
            record.processing_status,
            crate::model::ProcessingStatus::Pending
        );
    }

    #[tokio::test]
    async fn rejected_upload_leaves_no_record() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = PresentationStore::new();
        let blobs = BlobStore::new(dir.path());

        let mut up = pdf_upload();
        up.title = "ab".into();
        let err = create_presentation(&store, &blobs, &UploadPolicy::default(), up)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.get(crate::model::PresentationId(1)).is_err());
    }
}
