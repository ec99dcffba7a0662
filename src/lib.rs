//! # md2pdf
//!
//! Convert Markdown documents to PDF, from the command line, from Rust, or
//! over HTTP.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown file
//!  │
//!  ├─ 1. Input      read as UTF-8 (typed errors for missing/unreadable files)
//!  ├─ 2. Normalise  line endings, invisible characters, final newline
//!  ├─ 3. Render     md2pdf-render: parse, wrap, paginate, bookmarks
//!  └─ 4. Write      temp file in the target directory, then rename
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2pdf::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("README.md", None, &config).await?;
//!     println!("wrote {} ({} pages)",
//!         output.output_path.display(),
//!         output.stats.page_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `cli`    | on      | Enables the `md2pdf` binary (clap + anyhow + tracing-subscriber) |
//! | `server` | on      | Enables [`server`] and, with `cli`, the `md2pdf-server` binary (axum) |
//!
//! Disable both when using only the library:
//! ```toml
//! md2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, PageSize};
pub use convert::{convert, convert_markdown, convert_sync, default_output_path};
pub use error::Md2PdfError;
pub use md2pdf_render::{OutlineEntry, RenderedPdf};
pub use output::{ConversionOutput, ConversionStats};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
