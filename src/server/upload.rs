//! `POST /api/convert`: Markdown upload in, PDF download out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{
    Multipart, State,
    multipart::{Field, MultipartRejection},
};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::AppState;
use super::download::PdfDownload;
use super::error::ApiError;
use crate::config::ConversionConfig;
use crate::convert::{convert_sync, default_output_path};
use crate::output::ConversionOutput;

/// Multipart field carrying the upload.
pub const FILE_FIELD: &str = "file";

/// Whether an uploaded name is accepted. The check is a literal,
/// case-sensitive suffix match.
pub fn is_markdown_filename(name: &str) -> bool {
    name.ends_with(".md")
}

/// The final path component of a client-supplied filename. Both `/` and `\`
/// count as separators.
pub fn stored_file_name(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

pub async fn convert_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<PdfDownload, ApiError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        let name = stored_file_name(&raw_name).to_string();
        if !is_markdown_filename(&name) {
            return Err(ApiError::InvalidFileType);
        }

        return save_and_convert(&state, &name, field).await;
    }

    Err(ApiError::MissingFile)
}

async fn save_and_convert(
    state: &AppState,
    name: &str,
    field: Field<'_>,
) -> Result<PdfDownload, ApiError> {
    let workspace = state.workspace().map_err(ApiError::conversion)?;
    let input_path = workspace.path().join(name);
    let output_path = default_output_path(&input_path);

    let received = save_field(field, &input_path).await?;
    info!("Received upload '{}' ({} bytes)", name, received);

    let (workspace, output) =
        convert_in(workspace, input_path, output_path, Arc::clone(&state.config)).await?;

    let download_name = default_output_path(name).to_string_lossy().into_owned();
    open_download(workspace, &output.output_path, download_name).await
}

/// Run the converter on the blocking pool with `workspace` moved into the
/// task.
///
/// If the request is dropped while converting, the task keeps running and
/// the directory goes away only after the converter has finished writing
/// into it.
pub(crate) async fn convert_in(
    workspace: TempDir,
    input: PathBuf,
    output: PathBuf,
    config: Arc<ConversionConfig>,
) -> Result<(TempDir, ConversionOutput), ApiError> {
    let (workspace, result) = tokio::task::spawn_blocking(move || {
        let result = convert_sync(&input, Some(output.as_path()), &config);
        (workspace, result)
    })
    .await
    .map_err(|e| ApiError::conversion(format!("Conversion task panicked: {}", e)))?;

    match result {
        Ok(output) => Ok((workspace, output)),
        Err(e) => Err(e.into()),
    }
}

async fn save_field(mut field: Field<'_>, path: &Path) -> Result<u64, ApiError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(ApiError::conversion)?;
    let mut written = 0u64;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await.map_err(ApiError::conversion)?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(ApiError::conversion)?;
    Ok(written)
}

async fn open_download(
    workspace: TempDir,
    path: &Path,
    filename: String,
) -> Result<PdfDownload, ApiError> {
    PdfDownload::open(workspace, path, filename)
        .await
        .map_err(ApiError::conversion)
}
