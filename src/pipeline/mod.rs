//! Pipeline stages for Markdown-to-PDF conversion.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ normalise ──▶ render ──▶ write
//! (read)    (cleanup)    (engine)   (temp + rename)
//! ```
//!
//! 1. [`input`]     — read the file as UTF-8, mapping I/O failures to typed errors
//! 2. [`normalise`] — line endings, invisible characters, final newline
//! 3. [`render`]    — hand the text to `md2pdf-render` as a single section
//! 4. [`write`]     — write the PDF next to its destination, then rename it in

pub mod input;
pub mod normalise;
pub mod render;
pub mod write;
