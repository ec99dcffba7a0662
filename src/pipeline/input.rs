//! Input stage: read a Markdown file from disk.
//!
//! Existence is checked before the read so a missing file is reported as
//! [`Md2PdfError::FileNotFound`] rather than a generic I/O error.

use crate::error::Md2PdfError;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// Read `path` as UTF-8 text.
pub fn read_markdown(path: &Path) -> Result<String, Md2PdfError> {
    if !path.exists() {
        return Err(Md2PdfError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Md2PdfError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => Md2PdfError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Md2PdfError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let text = String::from_utf8(bytes).map_err(|e| Md2PdfError::InvalidEncoding {
        path: path.to_path_buf(),
        offset: e.utf8_error().valid_up_to(),
    })?;

    debug!("Read {} bytes from {}", text.len(), path.display());
    Ok(text)
}
