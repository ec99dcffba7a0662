//! Error types for the HTTP service.

use axum::{
    Json,
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::error::Md2PdfError;

/// A request that could not be turned into a PDF.
///
/// Every variant renders as `{"detail": "<message>"}` with the status from
/// [`ApiError::status`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The uploaded filename does not end in `.md`.
    #[error("Only .md files are allowed")]
    InvalidFileType,

    /// No multipart field named `file` was sent.
    #[error("Missing multipart field 'file'")]
    MissingFile,

    /// The multipart body was malformed or exceeded the size limit.
    #[error("{message}")]
    Multipart { status: StatusCode, message: String },

    /// Saving the upload or converting it failed.
    #[error("Conversion failed: {0}")]
    ConversionFailed(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidFileType => StatusCode::BAD_REQUEST,
            ApiError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Multipart { status, .. } => *status,
            // Input errors included: the file was just written by us, so a
            // failure to read it back is a server fault.
            ApiError::ConversionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn conversion(err: impl std::fmt::Display) -> Self {
        ApiError::ConversionFailed(err.to_string())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Multipart {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<Md2PdfError> for ApiError {
    fn from(err: Md2PdfError) -> Self {
        ApiError::conversion(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", self);
        } else {
            warn!(status = status.as_u16(), "{}", self);
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Failures starting or running the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::InvalidFileType.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MissingFile.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::conversion("disk full").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_maps_to_500() {
        let err: ApiError = Md2PdfError::FileNotFound {
            path: PathBuf::from("gone.md"),
        }
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Conversion failed: Input file not found: 'gone.md'");
    }

    #[test]
    fn response_carries_detail() {
        let resp = ApiError::InvalidFileType.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()[axum::http::header::CONTENT_TYPE],
            "application/json"
        );
    }
}
