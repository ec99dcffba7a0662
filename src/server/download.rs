//! Streaming a converted PDF back to the client.
//!
//! The request's temporary directory must outlive the response: the PDF is
//! read from it while the body streams. [`CleanupStream`] owns the
//! directory guard alongside the file reader, so the directory is removed
//! when the body is dropped. That happens after the last chunk is sent, when
//! the connection fails, or when the client goes away mid-download. The
//! removal itself runs on the blocking pool.

use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tempfile::TempDir;
use tokio::fs::File;
use tokio_stream::Stream;
use tokio_util::io::ReaderStream;

use super::remove_workspace;

/// RFC 5987 `attr-char`: everything except these is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// A finished PDF waiting to be sent.
#[derive(Debug)]
pub struct PdfDownload {
    file: File,
    len: u64,
    filename: String,
    workspace: TempDir,
}

impl PdfDownload {
    /// Open `path` (inside `workspace`) for streaming.
    ///
    /// On error the workspace is dropped, and with it the directory.
    pub async fn open(
        workspace: TempDir,
        path: &Path,
        filename: String,
    ) -> std::io::Result<Self> {
        let file = File::open(path).await?;
        let len = file.metadata().await?.len();
        Ok(Self {
            file,
            len,
            filename,
            workspace,
        })
    }
}

impl IntoResponse for PdfDownload {
    fn into_response(self) -> Response {
        let disposition = content_disposition(&self.filename);
        let stream = CleanupStream {
            inner: ReaderStream::new(self.file),
            workspace: Some(self.workspace),
        };
        (
            [
                (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
                (header::CONTENT_LENGTH, HeaderValue::from(self.len)),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            Body::from_stream(stream),
        )
            .into_response()
    }
}

/// File reader that removes its request directory when dropped.
pub struct CleanupStream {
    inner: ReaderStream<File>,
    workspace: Option<TempDir>,
}

impl Stream for CleanupStream {
    type Item = std::io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

impl Drop for CleanupStream {
    fn drop(&mut self) {
        if let Some(workspace) = self.workspace.take() {
            remove_workspace(workspace);
        }
    }
}

/// Build an `attachment` disposition for `filename`.
///
/// ASCII names are quoted directly. Other names get an ASCII fallback plus
/// the RFC 5987 `filename*` parameter.
pub fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    let value = if filename.is_ascii() && !filename.chars().any(|c| c.is_ascii_control()) {
        format!("attachment; filename=\"{}\"", fallback)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            fallback,
            utf8_percent_encode(filename, ATTR_CHAR)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
