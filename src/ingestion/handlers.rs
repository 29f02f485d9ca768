use super::placement::place_artifact;
use super::resolver::{package_from_header, parse_package_file_name, resolve_package};
use super::rpm_header::{read_header_tags, RpmHeaderError};
use super::types::{ArtifactPlacement, IngestError, IngestSettings, RpmPackage, StatusResponse};
use crate::coordinator::Coordinator;

use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Optional header with the package's original file name. Only consulted when the
/// stored file has no readable RPM header; without it the stored file's own name
/// is parsed.
pub const PACKAGE_FILENAME_HEADER: &str = "X-Package-Filename";

pub fn router(coordinator: Arc<Coordinator>, settings: Arc<IngestSettings>, prefix_url: &str) -> Router {
    let upload_route = format!("/{}", prefix_url.trim_matches('/'));

    Router::new()
        .route("/", get(handle_root))
        .route("/status", get(handle_status))
        .route(&upload_route, put(handle_upload))
        .layer(Extension(coordinator))
        .layer(Extension(settings))
        .layer(middleware::from_fn(log_requests))
}

pub async fn handle_root() -> &'static str {
    "Hello from repo!"
}

/// Accepts a package the reverse proxy already stored on disk.
///
/// The partition is queued for re-indexing only after the file is in place; the
/// response does not wait for the rebuild.
pub async fn handle_upload(
    Extension(coordinator): Extension<Arc<Coordinator>>,
    Extension(settings): Extension<Arc<IngestSettings>>,
    headers: HeaderMap,
) -> (StatusCode, String) {
    match ingest(&settings, &headers).await {
        Ok(placement) => {
            coordinator.submit(placement.partition);
            (
                StatusCode::OK,
                format!("OK - Accessible as {}", placement.destination.display()),
            )
        }
        Err(e) => {
            tracing::warn!("Upload rejected: {}", e);
            (e.status_code(), e.to_string())
        }
    }
}

pub async fn handle_status(Extension(coordinator): Extension<Arc<Coordinator>>) -> Json<StatusResponse> {
    let queued: Vec<String> = coordinator
        .queue()
        .snapshot()
        .into_iter()
        .map(|partition| partition.0)
        .collect();

    Json(StatusResponse {
        queue_length: queued.len(),
        queued,
        shutting_down: coordinator.is_shutting_down(),
        stats: coordinator.stats(),
    })
}

async fn ingest(settings: &IngestSettings, headers: &HeaderMap) -> Result<ArtifactPlacement, IngestError> {
    let stored = header_value(headers, &settings.upload_header)
        .ok_or_else(|| IngestError::MissingHeader(settings.upload_header.clone()))?;
    let stored = PathBuf::from(stored);

    let package = identify_package(&stored, headers).await?;
    let placement = resolve_package(&package, &settings.top_dir);
    place_artifact(&stored, &placement).await?;
    Ok(placement)
}

/// The RPM header decides; a file that has none is identified by its file name.
async fn identify_package(stored: &Path, headers: &HeaderMap) -> Result<RpmPackage, IngestError> {
    match read_header_tags(stored).await {
        Ok(tags) => package_from_header(&tags),
        Err(RpmHeaderError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(IngestError::SourceNotFound(stored.to_path_buf()))
        }
        Err(e) => {
            tracing::debug!(stored = %stored.display(), "No usable RPM header, using file name: {}", e);
            let file_name = match header_value(headers, PACKAGE_FILENAME_HEADER) {
                Some(name) => name.to_string(),
                None => stored_file_name(stored)?,
            };
            parse_package_file_name(&file_name)
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn stored_file_name(stored: &Path) -> Result<String, IngestError> {
    stored
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| IngestError::InvalidArtifact {
            file_name: stored.display().to_string(),
            reason: "stored path has no file name".to_string(),
        })
}

/// Logs every request and its response status.
pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    tracing::debug!(%method, %uri, headers = ?req.headers(), "Request");
    let response = next.run(req).await;
    tracing::info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed = ?started.elapsed(),
        "Response"
    );

    response
}
