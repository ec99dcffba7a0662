//! Configuration types for Markdown-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. One config is shared by every
//! conversion the HTTP service performs, so it is cheap to clone and holds no
//! per-request state.

use crate::error::Md2PdfError;
use crate::progress::ProgressCallback;
pub use md2pdf_render::PageSize;
use md2pdf_render::RenderOptions;
use std::fmt;

/// Configuration for a Markdown-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use md2pdf::{ConversionConfig, PageSize};
///
/// let config = ConversionConfig::builder()
///     .page_size(PageSize::Letter)
///     .toc_level(3)
///     .font_size(10.5)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Deepest heading level that becomes a PDF bookmark. Range: 0–6. Default: 2.
    ///
    /// 0 produces a PDF without an outline.
    pub toc_level: u8,

    /// Physical page size. Default: [`PageSize::A4`].
    pub page_size: PageSize,

    /// Margin on all sides in millimetres. Range: 0–100. Default: 20.
    pub margin_mm: f32,

    /// Body font size in points. Range: 4–72. Default: 11.
    pub font_size: f32,

    /// Title written to the PDF info dictionary. If None, the first heading
    /// of the document is used.
    pub title: Option<String>,

    /// Optional progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            toc_level: render.toc_level,
            page_size: render.page_size,
            margin_mm: render.margin_mm,
            font_size: render.font_size,
            title: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("toc_level", &self.toc_level)
            .field("page_size", &self.page_size)
            .field("margin_mm", &self.margin_mm)
            .field("font_size", &self.font_size)
            .field("title", &self.title)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// The options handed to the rendering engine.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            page_size: self.page_size,
            margin_mm: self.margin_mm,
            font_size: self.font_size,
            toc_level: self.toc_level,
            title: self.title.clone(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn toc_level(mut self, level: u8) -> Self {
        self.config.toc_level = level.min(6);
        self
    }

    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn margin_mm(mut self, mm: f32) -> Self {
        self.config.margin_mm = mm.clamp(0.0, 100.0);
        self
    }

    pub fn font_size(mut self, pt: f32) -> Self {
        self.config.font_size = pt.clamp(4.0, 72.0);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.config.title = if title.trim().is_empty() {
            None
        } else {
            Some(title)
        };
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Fails when the margins leave no printable area on the chosen page.
    pub fn build(self) -> Result<ConversionConfig, Md2PdfError> {
        let c = &self.config;
        if !c.margin_mm.is_finite() || !c.font_size.is_finite() {
            return Err(Md2PdfError::InvalidConfig(
                "margin and font size must be finite numbers".into(),
            ));
        }
        c.render_options()
            .validate()
            .map_err(|e| Md2PdfError::InvalidConfig(e.to_string()))?;
        Ok(self.config)
    }
}
