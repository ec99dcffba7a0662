//! Render stage: lay the Markdown out as PDF via `md2pdf-render`.
//!
//! The engine is synchronous and CPU-bound. Async callers reach it through
//! [`crate::convert::convert`], which runs the whole conversion inside
//! `tokio::task::spawn_blocking`.

use crate::config::ConversionConfig;
use crate::error::Md2PdfError;
use md2pdf_render::{RenderedPdf, Renderer, Section};
use tracing::debug;

/// Render one Markdown document as a single section.
pub fn render_markdown(text: &str, config: &ConversionConfig) -> Result<RenderedPdf, Md2PdfError> {
    let mut renderer = Renderer::new(config.render_options());
    renderer.add_section(Section::new(text));
    let pdf = renderer.render()?;
    debug!(
        "Rendered {} pages, {} bookmarks, title {:?}",
        pdf.page_count,
        pdf.outline.len(),
        pdf.title
    );
    Ok(pdf)
}
