//! Output stage: atomic write of the PDF.
//!
//! The bytes go to a temporary file in the destination directory, which is
//! then renamed over the target. A failure at any point leaves the target
//! untouched, and the temporary file is removed when its handle drops.
//! The destination directory must already exist.

use crate::error::Md2PdfError;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Write `bytes` to `path`, replacing any existing file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Md2PdfError> {
    let fail = |source: std::io::Error| Md2PdfError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".md2pdf-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(fail)?;
    tmp.write_all(bytes).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;
    tmp.persist(path).map_err(|e| fail(e.error))?;

    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
