//! Ingestion Data Types
//!
//! Package identity parsed from an uploaded artifact, where it lands in the
//! repository tree, and the errors that turn into non-2xx responses.

use crate::coordinator::types::{PartitionId, StatsSnapshot};

use axum::http::StatusCode;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Identity of an RPM package, taken from its `name-version-release.arch.rpm` file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmPackage {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
    /// Distribution tag from the release, e.g. `el` in `1.el7`.
    pub os_abbr: String,
    /// Distribution release from the release, e.g. `7` in `1.el7`.
    pub os_release: String,
}

impl RpmPackage {
    /// Canonical file name inside the repository.
    pub fn file_name(&self) -> String {
        format!("{}-{}-{}.{}.rpm", self.name, self.version, self.release, self.arch)
    }

    pub fn partition(&self) -> PartitionId {
        PartitionId::new(&self.os_release, &self.arch)
    }
}

/// Where an uploaded artifact goes and which partition must be re-indexed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPlacement {
    pub partition: PartitionId,
    pub destination: PathBuf,
}

/// Upload endpoint parameters.
#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub top_dir: PathBuf,
    /// Header carrying the path of the request body stored by the reverse proxy.
    pub upload_header: String,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("missing request header {0}")]
    MissingHeader(String),
    #[error("invalid package {file_name}: {reason}")]
    InvalidArtifact { file_name: String, reason: String },
    #[error("uploaded file {} not found", .0.display())]
    SourceNotFound(PathBuf),
    #[error("failed to place package at {}: {}", .destination.display(), .source)]
    Placement {
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IngestError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            IngestError::InvalidArtifact { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            IngestError::SourceNotFound(_) => StatusCode::NOT_FOUND,
            IngestError::Placement { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body of `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub queued: Vec<String>,
    pub queue_length: usize,
    pub shutting_down: bool,
    #[serde(flatten)]
    pub stats: StatsSnapshot,
}
