use crate::ingest::{self, Layout};
use crate::paths::{self, PathError};
use crate::web::{ApiError, ApiResult, AppState, LANDING_PAGE};
use crate::{emit, process, utils, Result};
use anyhow::Context;
use axum::{
    extract::{Multipart, Path, State},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION},
        HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use std::io::ErrorKind;
use std::path::Path as FsPath;
use std::time::SystemTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

const CSV_CONTENT_TYPE: &str = "text/csv";
const PROCESSED_PREFIX: &str = "processed-";
const X_DOWNLOAD_PATH: HeaderName = HeaderName::from_static("x-download-path");

/// GET / - Redirect to the landing page
pub(super) async fn index() -> impl IntoResponse {
    (StatusCode::MOVED_PERMANENTLY, [(LOCATION, LANDING_PAGE)])
}

/// POST /upload - Process an uploaded export
///
/// Expects a multipart form with a `file` field. The upload is saved to the uploads directory,
/// processed and streamed back as `processed.csv`. Unless `keep_downloads` is zero the result
/// is also saved to the downloads directory, where only the newest `keep_downloads` processed
/// files are kept.
pub(super) async fn upload(
    State(config): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let (file_name, data) = read_file_field(&mut multipart).await?;

    let saved = paths::upload_path(config.uploads(), &file_name).inspect_err(|e| {
        warn!("Rejected upload: {e}");
    })?;
    utils::write(&saved, &data)
        .await
        .map_err(ApiError::Internal)?;
    info!(path = %saved.display(), bytes = data.len(), "Saved uploaded file");

    let records = ingest::read(data.as_slice(), Layout::Export).map_err(ApiError::ReadCsv)?;
    let processed = process::process_records(&records);
    let body = emit::to_bytes(&processed).map_err(ApiError::Internal)?;

    let download_name = if config.keep_downloads() > 0 {
        let name = format!("{PROCESSED_PREFIX}{}.csv", Uuid::new_v4());
        let path = config.downloads().join(&name);
        utils::write(&path, &body)
            .await
            .map_err(ApiError::Internal)?;
        match prune_downloads(config.downloads(), config.keep_downloads(), &path).await {
            Ok(0) => {}
            Ok(removed) => debug!(removed, "Pruned old processed files"),
            Err(e) => warn!("Unable to prune the downloads directory: {e:#}"),
        }
        Some(name)
    } else {
        None
    };
    info!(file = ?download_name, "Processed file streamed to client");

    let headers = [
        (CONTENT_TYPE, CSV_CONTENT_TYPE),
        (CONTENT_DISPOSITION, "attachment; filename=processed.csv"),
    ];
    let mut response = (headers, body).into_response();
    if let Some(name) = download_name {
        let value = HeaderValue::from_str(&format!("/download/{name}"))
            .map_err(|e| ApiError::Internal(e.into()))?;
        response.headers_mut().insert(X_DOWNLOAD_PATH, value);
    }
    Ok(response)
}

/// GET /download/{filename} - Serve a file from the downloads directory
pub(super) async fn download(
    State(config): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let path = paths::download_path(config.downloads(), &filename).inspect_err(|e| {
        warn!("Rejected download: {e}");
    })?;

    let canonical = match tokio::fs::canonicalize(&path).await {
        Ok(p) => p,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ApiError::NotFound),
        Err(e) => return Err(ApiError::Internal(e.into())),
    };
    if !paths::is_within(config.downloads(), &canonical) {
        warn!(path = %canonical.display(), "Download resolves outside of the downloads directory");
        return Err(PathError::OutsideDirectory(filename).into());
    }
    let metadata = tokio::fs::metadata(&canonical)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    if !metadata.is_file() {
        return Err(ApiError::NotFound);
    }

    let body = utils::read_bytes(&canonical)
        .await
        .map_err(ApiError::Internal)?;
    debug!(path = %canonical.display(), bytes = body.len(), "Serving download");

    let content_type = match canonical.extension().and_then(|e| e.to_str()) {
        Some("csv") => CSV_CONTENT_TYPE,
        _ => "application/octet-stream",
    };
    let name = canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let headers = [
        (CONTENT_TYPE, content_type.to_string()),
        (CONTENT_DISPOSITION, format!("attachment; filename=\"{name}\"")),
    ];
    Ok((headers, body).into_response())
}

/// Returns the client's file name and the contents of the `file` field.
async fn read_file_field(multipart: &mut Multipart) -> ApiResult<(String, Vec<u8>)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok((file_name, data.to_vec()));
    }
    Err(ApiError::MissingFile)
}

/// Deletes the oldest processed files in `dir` so that at most `keep` remain, counting `newest`,
/// which is never deleted. Returns how many files were removed.
async fn prune_downloads(dir: &FsPath, keep: usize, newest: &FsPath) -> Result<usize> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Unable to list {}", dir.display()))?;

    let mut older = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Unable to list {}", dir.display()))?
    {
        let path = entry.path();
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.starts_with(PROCESSED_PREFIX) || !name.ends_with(".csv") || path == newest {
            continue;
        }
        let metadata = entry.metadata().await?;
        if metadata.is_file() {
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            older.push((modified, path));
        }
    }

    older.sort();
    let excess = older.len().saturating_sub(keep.saturating_sub(1));
    for (_, path) in older.into_iter().take(excess) {
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("Unable to remove {}", path.display()))?;
    }
    Ok(excess)
}
