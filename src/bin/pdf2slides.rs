//! CLI binary for pdf2slides.
//!
//! A thin shim over the library crate: it builds a workspace (record store +
//! blob store) rooted at the output directory, uploads the given PDF through
//! the same validation the web collaborator uses, runs the conversion
//! pipeline, and prints the outcome.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2slides::{
    conversion_status, create_presentation, BlobStore, ConversionConfig, ConversionProgress,
    PdfUpload, PresentationStore, SlideFormat, SlidePipeline, UploadPolicy,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress reporter using indicatif ────────────────────────────────────

/// Terminal progress reporter: a live bar plus a per-slide log line.
struct CliProgress {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Rendering");
        bar.set_message("Rasterising PDF pages…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl ConversionProgress for CliProgress {
    fn on_conversion_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} slides  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Rasterised {total_pages} pages, creating slides…"))
        ));
    }

    fn on_slide_start(&self, slide_number: usize, _total: usize) {
        self.bar.set_message(format!("slide {slide_number}"));
    }

    fn on_slide_complete(&self, slide_number: usize, total: usize, image_bytes: usize) {
        self.bar.println(format!(
            "  {} Slide {:>3}/{:<3}  {}",
            green("✓"),
            slide_number,
            total,
            dim(&format!("{:.1} KB", image_bytes as f64 / 1024.0)),
        ));
        self.bar.inc(1);
    }

    fn on_slide_error(&self, slide_number: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Slide {:>3}/{:<3}  {}",
            red("✗"),
            slide_number,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize, created_count: usize) {
        let failed = total_pages.saturating_sub(created_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} slides created",
                green("✔"),
                bold(&created_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} slides created  ({} skipped)",
                cyan("⚠"),
                bold(&created_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a deck into ./media (JPEG, 1920×1080, 200 DPI)
  pdf2slides deck.pdf

  # PNG slides in a custom directory
  pdf2slides deck.pdf --out /srv/media --format png

  # Smaller slides for thumbnails
  pdf2slides deck.pdf --max-width 640 --max-height 360 --quality 70

  # Machine-readable outcome summary
  pdf2slides deck.pdf --json

ENVIRONMENT VARIABLES:
  PDF2SLIDES_MAX_UPLOAD_MB  Maximum accepted PDF size in MB (default: 50)
  PDFIUM_LIB_PATH           Path to an existing libpdfium build
  RUST_LOG                  Log filter, e.g. pdf2slides=debug
"#;

/// Convert a PDF presentation into optimized slide images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2slides",
    version,
    about = "Convert a PDF presentation into optimized slide images",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file to convert.
    input: PathBuf,

    /// Output directory for slide images and the stored PDF.
    #[arg(short, long, default_value = "./media")]
    out: PathBuf,

    /// Presentation title (defaults to the file name).
    #[arg(short, long)]
    title: Option<String>,

    /// Rendering resolution in DPI (72–600).
    #[arg(long, default_value_t = 200)]
    dpi: u32,

    /// Output format: png or jpeg.
    #[arg(long, default_value = "jpeg")]
    format: String,

    /// JPEG quality (1–100).
    #[arg(short, long, default_value_t = 85)]
    quality: u8,

    /// Maximum slide width in pixels.
    #[arg(long, default_value_t = 1920)]
    max_width: u32,

    /// Maximum slide height in pixels.
    #[arg(long, default_value_t = 1080)]
    max_height: u32,

    /// Print the outcome summary as JSON instead of human-readable text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = match cli.format.to_lowercase().as_str() {
        "png" => SlideFormat::Png,
        "jpeg" | "jpg" => SlideFormat::Jpeg,
        other => anyhow::bail!("Unknown format '{other}' (expected png or jpeg)"),
    };

    let config = ConversionConfig::builder()
        .dpi(cli.dpi)
        .format(format)
        .jpeg_quality(cli.quality)
        .max_width(cli.max_width)
        .max_height(cli.max_height)
        .build()?;

    let filename = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("Input path has no file name")?;
    let title = cli.title.clone().unwrap_or_else(|| {
        cli.input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.clone())
    });

    let bytes = std::fs::read(&cli.input)
        .with_context(|| format!("Failed to read '{}'", cli.input.display()))?;

    let store = Arc::new(PresentationStore::new());
    let blobs = Arc::new(BlobStore::new(&cli.out));

    let record = create_presentation(
        &store,
        &blobs,
        &UploadPolicy::from_env(),
        PdfUpload {
            title,
            filename,
            content_type: "application/pdf".into(),
            bytes,
        },
    )
    .await?;

    let pipeline = SlidePipeline::new(Arc::clone(&store), Arc::clone(&blobs), config);
    let progress = CliProgress::new();
    let outcome = pipeline
        .convert_with_progress(record.id, progress.as_ref())
        .await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let status = conversion_status(&store, record.id)?;
    println!();
    println!(
        "{}  '{}' — {} slides from {} pages ({})",
        bold("Done."),
        outcome.title,
        outcome.slides_created,
        outcome.total_pages,
        outcome.status
    );
    println!(
        "{}",
        dim(&format!(
            "PDF: {} ({:.2} MB)  →  slides under {}",
            status.pdf_filename,
            status.pdf_size_mb,
            cli.out
                .join("presentations/slides")
                .join(record.id.to_string())
                .display()
        ))
    );

    Ok(())
}
