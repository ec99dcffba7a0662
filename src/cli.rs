//! Argument types and logging setup shared by the `md2pdf` and
//! `md2pdf-server` binaries.

use crate::config::{ConversionConfig, PageSize};
use crate::error::Md2PdfError;
use crate::progress::ProgressCallback;
use clap::Args;
use std::io;
use tracing_subscriber::EnvFilter;

/// Layout options, identical for both binaries.
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Deepest heading level added to the PDF outline (0 disables it).
    #[arg(long, env = "MD2PDF_TOC_LEVEL", default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(0..=6))]
    pub toc_level: u8,

    /// Page size.
    #[arg(long, env = "MD2PDF_PAGE_SIZE", value_enum, default_value = "a4")]
    pub page_size: PageSizeArg,

    /// Page margin in millimetres.
    #[arg(long, env = "MD2PDF_MARGIN", default_value_t = 20.0)]
    pub margin: f32,

    /// Body font size in points (4–72).
    #[arg(long, env = "MD2PDF_FONT_SIZE", default_value_t = 11.0)]
    pub font_size: f32,

    /// Document title. Defaults to the first heading.
    #[arg(long, env = "MD2PDF_TITLE")]
    pub title: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum PageSizeArg {
    A4,
    Letter,
    Legal,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
        }
    }
}

impl RenderArgs {
    /// Map the args onto a validated [`ConversionConfig`].
    pub fn to_config(
        &self,
        progress: Option<ProgressCallback>,
    ) -> Result<ConversionConfig, Md2PdfError> {
        let mut builder = ConversionConfig::builder()
            .toc_level(self.toc_level)
            .page_size(self.page_size.into())
            .margin_mm(self.margin)
            .font_size(self.font_size);

        if let Some(ref title) = self.title {
            builder = builder.title(title.clone());
        }
        if let Some(cb) = progress {
            builder = builder.progress_callback(cb);
        }

        builder.build()
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` overrides `default_filter` when set.
pub fn init_logging(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
