//! Error type for the md2pdf library.
//!
//! Every fallible library call returns [`Md2PdfError`]. Variants carry the
//! path involved so the CLI can print a useful message without extra context.
//! Rendering failures from the engine crate are folded into
//! [`Md2PdfError::RenderFailed`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the md2pdf library.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nTry: chmod +r {path:?}", path.display())]
    PermissionDenied { path: PathBuf },

    /// The file was read but its contents are not valid UTF-8.
    #[error("Input file '{}' is not valid UTF-8 text (invalid byte at offset {offset})", path.display())]
    InvalidEncoding { path: PathBuf, offset: usize },

    /// Any other I/O failure while reading the input.
    #[error("Failed to read '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Render errors ─────────────────────────────────────────────────────
    /// The rendering engine rejected the document or its options.
    #[error("Rendering failed: {0}")]
    RenderFailed(#[from] md2pdf_render::RenderError),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create, write or rename the output PDF.
    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Md2PdfError {
    /// True for errors caused by the input file rather than by rendering or
    /// writing.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Md2PdfError::FileNotFound { .. }
                | Md2PdfError::PermissionDenied { .. }
                | Md2PdfError::InvalidEncoding { .. }
                | Md2PdfError::ReadFailed { .. }
        )
    }
}
