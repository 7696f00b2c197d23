//! Progress-reporter trait for per-slide conversion events.
//!
//! The pipeline does not own a task queue or a delivery channel; the host
//! runner (a web worker, a job queue consumer, a CLI) injects a reporter and
//! forwards events however it likes — a progress bar, a websocket, a task
//! state record. All methods have default no-op implementations so callers
//! only override what they care about.

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each slide.
///
/// Implementations must be `Send + Sync`; the pipeline itself invokes the
/// methods sequentially (slides are processed one at a time, in order), but
/// the reporter may be shared with other threads by the host.
pub trait ConversionProgress: Send + Sync {
    /// Called once after rasterization, before any slide is persisted.
    ///
    /// # Arguments
    /// * `total_pages` — number of raster pages the attempt will process
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a slide is optimized and persisted.
    fn on_slide_start(&self, slide_number: usize, total_pages: usize) {
        let _ = (slide_number, total_pages);
    }

    /// Called when a slide has been persisted.
    ///
    /// # Arguments
    /// * `image_bytes` — encoded size of the stored slide image
    fn on_slide_complete(&self, slide_number: usize, total_pages: usize, image_bytes: usize) {
        let _ = (slide_number, total_pages, image_bytes);
    }

    /// Called when a slide failed and was skipped (best-effort policy).
    fn on_slide_error(&self, slide_number: usize, total_pages: usize, error: &str) {
        let _ = (slide_number, total_pages, error);
    }

    /// Called once after all slides have been attempted.
    ///
    /// # Arguments
    /// * `created_count` — slides actually persisted (may be < `total_pages`)
    fn on_conversion_complete(&self, total_pages: usize, created_count: usize) {
        let _ = (total_pages, created_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl ConversionProgress for NoopProgress {}

/// Convenience alias for a shared reporter.
pub type ProgressReporter = Arc<dyn ConversionProgress>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingProgress {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        final_created: AtomicUsize,
    }

    impl ConversionProgress for TrackingProgress {
        fn on_slide_start(&self, _n: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_slide_complete(&self, _n: usize, _total: usize, _bytes: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_slide_error(&self, _n: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, _total: usize, created: usize) {
            self.final_created.store(created, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_reporter_does_not_panic() {
        let p = NoopProgress;
        p.on_conversion_start(5);
        p.on_slide_start(1, 5);
        p.on_slide_complete(1, 5, 42);
        p.on_slide_error(2, 5, "storage error");
        p.on_conversion_complete(5, 4);
    }

    #[test]
    fn tracking_reporter_receives_events() {
        let tracker = TrackingProgress {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            final_created: AtomicUsize::new(0),
        };

        tracker.on_conversion_start(3);
        tracker.on_slide_start(1, 3);
        tracker.on_slide_complete(1, 3, 100);
        tracker.on_slide_start(2, 3);
        tracker.on_slide_error(2, 3, "disk full");
        tracker.on_slide_start(3, 3);
        tracker.on_slide_complete(3, 3, 200);
        tracker.on_conversion_complete(3, 2);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.final_created.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_reporter_works() {
        let p: ProgressReporter = Arc::new(NoopProgress);
        p.on_conversion_start(10);
        p.on_slide_complete(1, 10, 512);
    }
}
