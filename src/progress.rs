//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to be told
//! when a conversion starts, when rendering finishes and when the PDF has
//! been written. The CLI uses this to drive its spinner.
//!
//! # Example
//!
//! ```rust
//! use md2pdf::{ConversionProgressCallback, ConversionConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct Announce;
//!
//! impl ConversionProgressCallback for Announce {
//!     fn on_conversion_complete(&self, output: &Path, pages: usize) {
//!         eprintln!("wrote {} ({} pages)", output.display(), pages);
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(Announce))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the converter at each stage of a conversion.
///
/// Implementations must be `Send + Sync`: the async entry point runs the
/// conversion on tokio's blocking pool, and the HTTP service shares one
/// config across concurrent requests. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once the input has been read, before rendering.
    ///
    /// # Arguments
    /// * `input`       — path of the Markdown file
    /// * `input_bytes` — size of the normalised Markdown text
    fn on_conversion_start(&self, input: &Path, input_bytes: usize) {
        let _ = (input, input_bytes);
    }

    /// Called when the engine has produced the PDF bytes, before writing.
    fn on_render_complete(&self, page_count: usize, pdf_bytes: usize) {
        let _ = (page_count, pdf_bytes);
    }

    /// Called after the PDF has been moved into place.
    fn on_conversion_complete(&self, output: &Path, page_count: usize) {
        let _ = (output, page_count);
    }

    /// Called when the conversion fails at any stage.
    fn on_conversion_error(&self, input: &Path, error: &str) {
        let _ = (input, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
