//! Conversion entry points.
//!
//! [`convert_sync`] does the work: read, normalise, render, write. It is
//! fully synchronous, which suits the CLI. [`convert`] is the same call moved
//! onto tokio's blocking pool for async callers such as the HTTP service.
//! [`convert_markdown`] skips the filesystem entirely.

use crate::config::ConversionConfig;
use crate::error::Md2PdfError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::{input, normalise, render, write};
use md2pdf_render::RenderedPdf;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// The output path used when none is given: the input path with its
/// extension replaced by `pdf`.
///
/// ```rust
/// use md2pdf::default_output_path;
/// use std::path::Path;
///
/// assert_eq!(default_output_path("notes/readme.md"), Path::new("notes/readme.pdf"));
/// assert_eq!(default_output_path("README"), Path::new("README.pdf"));
/// ```
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    input.as_ref().with_extension("pdf")
}

/// Convert a Markdown file to PDF.
///
/// # Arguments
/// * `input`  — path of an existing, readable UTF-8 Markdown file
/// * `output` — where to write the PDF; defaults to [`default_output_path`]
/// * `config` — conversion configuration
///
/// # Returns
/// The path the PDF was written to, plus statistics. An existing file at that
/// path is replaced. The input file is never modified.
///
/// # Errors
/// - [`Md2PdfError::FileNotFound`] when `input` does not exist (no file is written)
/// - [`Md2PdfError::PermissionDenied`], [`Md2PdfError::InvalidEncoding`] or
///   [`Md2PdfError::ReadFailed`] when it cannot be read as text
/// - [`Md2PdfError::RenderFailed`] when the engine rejects the document
/// - [`Md2PdfError::OutputWriteFailed`] when the PDF cannot be written, e.g.
///   because the output directory does not exist
pub fn convert_sync(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    let input = input.as_ref();
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_path(input),
    };

    let result = run(input, &output_path, config);
    if let Err(ref e) = result {
        warn!("Conversion of {} failed: {}", input.display(), e);
        if let Some(ref cb) = config.progress_callback {
            cb.on_conversion_error(input, &e.to_string());
        }
    }
    result
}

/// Async wrapper around [`convert_sync`].
///
/// Runs the conversion on tokio's blocking pool so the calling worker thread
/// stays free while the file is read, rendered and written.
pub async fn convert(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    let input = input.as_ref().to_path_buf();
    let output = output.map(Path::to_path_buf);
    let config = config.clone();

    tokio::task::spawn_blocking(move || convert_sync(&input, output.as_deref(), &config))
        .await
        .map_err(|e| Md2PdfError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Convert Markdown text in memory, without touching the filesystem.
///
/// The text goes through the same normalisation as file input.
///
/// # Example
/// ```rust
/// use md2pdf::{convert_markdown, ConversionConfig};
///
/// let pdf = convert_markdown("# Hello\n\nWorld.", &ConversionConfig::default()).unwrap();
/// assert!(pdf.bytes.starts_with(b"%PDF"));
/// assert_eq!(pdf.title, "Hello");
/// ```
pub fn convert_markdown(text: &str, config: &ConversionConfig) -> Result<RenderedPdf, Md2PdfError> {
    let text = normalise::normalise_markdown(text);
    render::render_markdown(&text, config)
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn run(
    input: &Path,
    output_path: &Path,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Md2PdfError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", input.display());

    // ── Step 1: Read input ───────────────────────────────────────────────
    let raw = input::read_markdown(input)?;

    // ── Step 2: Normalise ────────────────────────────────────────────────
    let text = normalise::normalise_markdown(&raw);
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(input, text.len());
    }

    // ── Step 3: Render ───────────────────────────────────────────────────
    let render_start = Instant::now();
    let pdf = render::render_markdown(&text, config)?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_complete(pdf.page_count, pdf.bytes.len());
    }

    // ── Step 4: Write output ─────────────────────────────────────────────
    write::write_atomic(output_path, &pdf.bytes)?;

    let stats = ConversionStats {
        page_count: pdf.page_count,
        outline_entries: pdf.outline.len(),
        input_bytes: text.len(),
        output_bytes: pdf.bytes.len(),
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} -> {} ({} pages, {}ms total)",
        input.display(),
        output_path.display(),
        stats.page_count,
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(output_path, stats.page_count);
    }

    Ok(ConversionOutput {
        output_path: output_path.to_path_buf(),
        stats,
    })
}
