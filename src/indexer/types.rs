use crate::coordinator::types::PartitionId;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Captured result of a successful indexer run.
#[derive(Debug, Clone, Default)]
pub struct IndexerOutput {
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("failed to start indexer {}: {}", .executable.display(), .source)]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("indexer exited with {}: {}", exit_code_label(.code), .stderr.trim())]
    ExitStatus { code: Option<i32>, stderr: String },
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Rebuilds the searchable metadata of one repository partition.
///
/// The update worker is the only caller and never runs two rebuilds at once.
#[async_trait]
pub trait Indexer: Send + Sync {
    async fn rebuild(&self, partition: &PartitionId, path: &Path) -> Result<IndexerOutput, IndexerError>;
}
