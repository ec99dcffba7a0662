//! # md2pdf-render
//!
//! Lay out Markdown text onto PDF pages.
//!
//! The engine uses only the PDF base-14 fonts (Helvetica family and Courier),
//! so it needs no font files on disk and produces identical output on every
//! machine. That keeps the crate dependency-light and hermetic in tests, at the
//! cost of typographic range: characters outside Latin-1 are transliterated
//! or replaced (see [`text::sanitize`]).
//!
//! ## Pipeline
//!
//! ```text
//! Markdown ──▶ blocks ──▶ layout ──▶ pdf ──▶ outline
//!            (pulldown)  (wrap +    (printpdf) (lopdf,
//!                        paginate)             nested bookmarks)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use md2pdf_render::{RenderOptions, Renderer, Section};
//!
//! let mut renderer = Renderer::new(RenderOptions::default());
//! renderer.add_section(Section::new("# Hello\n\nWorld."));
//! let pdf = renderer.render().expect("render");
//! std::fs::write("hello.pdf", &pdf.bytes).unwrap();
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod blocks;
pub mod layout;
mod outline;
mod pdf;
pub mod text;

use std::time::Instant;
use thiserror::Error;
use tracing::debug;

// ── Error type ───────────────────────────────────────────────────────────

/// Errors returned by the rendering engine.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The options describe a page that cannot hold any text.
    #[error("invalid render options: {0}")]
    InvalidOptions(String),

    /// A base-14 font could not be registered with the document.
    #[error("font setup failed: {0}")]
    Font(String),

    /// The document could not be serialised to PDF bytes.
    #[error("PDF serialisation failed: {0}")]
    Pdf(String),
}

// ── Options ──────────────────────────────────────────────────────────────

/// Physical page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// ISO A4, 210 × 297 mm. (default)
    #[default]
    A4,
    /// US Letter, 8.5 × 11 in.
    Letter,
    /// US Legal, 8.5 × 14 in.
    Legal,
}

impl PageSize {
    /// Width and height in PDF points (1/72 in).
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }
}

/// Layout options shared by every section of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub page_size: PageSize,
    /// Margin on all four sides, in millimetres. Default: 20.
    pub margin_mm: f32,
    /// Body text size in points. Headings scale from this. Default: 11.
    pub font_size: f32,
    /// Deepest heading level that becomes a PDF bookmark. 0 disables the
    /// outline. Default: 2.
    pub toc_level: u8,
    /// Document title stored in the PDF info dictionary. Falls back to the
    /// first heading, then to "Untitled".
    pub title: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_mm: 20.0,
            font_size: 11.0,
            toc_level: 2,
            title: None,
        }
    }
}

impl RenderOptions {
    /// Check that the options describe a page that can hold text.
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(4.0..=72.0).contains(&self.font_size) {
            return Err(RenderError::InvalidOptions(format!(
                "font size must be 4–72pt, got {}",
                self.font_size
            )));
        }
        let (width, height) = self.page_size.dimensions_pt();
        let margin = layout::mm_to_pt(self.margin_mm);
        if margin < 0.0 || width - 2.0 * margin < 72.0 || height - 2.0 * margin < 72.0 {
            return Err(RenderError::InvalidOptions(format!(
                "margin of {}mm leaves no room for text on a {:?} page",
                self.margin_mm, self.page_size
            )));
        }
        Ok(())
    }
}

// ── Input / output types ─────────────────────────────────────────────────

/// One unit of Markdown content. Every section starts on a new page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub text: String,
    /// Whether this section's headings go into the document outline.
    pub toc: bool,
}

impl Section {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            toc: true,
        }
    }

    /// Exclude this section's headings from the outline.
    pub fn without_toc(mut self) -> Self {
        self.toc = false;
        self
    }
}

/// A bookmark in the PDF outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    /// Heading level, 1–6.
    pub level: u8,
    /// 0-indexed page the heading appears on.
    pub page: usize,
}

/// The finished document.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub outline: Vec<OutlineEntry>,
    pub title: String,
}

// ── Renderer ─────────────────────────────────────────────────────────────

/// Collects sections and renders them into a single PDF.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: RenderOptions,
    sections: Vec<Section>,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Parse, lay out and serialise every section.
    ///
    /// A renderer with no sections (or only empty ones) still produces a
    /// valid single-page PDF.
    pub fn render(&self) -> Result<RenderedPdf, RenderError> {
        self.options.validate()?;
        let start = Instant::now();

        let parsed: Vec<(Vec<blocks::Block>, bool)> = self
            .sections
            .iter()
            .map(|s| (blocks::parse(&s.text), s.toc))
            .collect();

        let laid_out = layout::layout_document(&parsed, &self.options);

        let title = self
            .options
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| laid_out.first_heading.clone())
            .unwrap_or_else(|| "Untitled".to_string());

        let bytes = pdf::write_pdf(&laid_out, &title)?;

        debug!(
            pages = laid_out.pages.len(),
            bookmarks = laid_out.outline.len(),
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered PDF"
        );

        Ok(RenderedPdf {
            bytes,
            page_count: laid_out.pages.len(),
            outline: laid_out.outline,
            title,
        })
    }
}
