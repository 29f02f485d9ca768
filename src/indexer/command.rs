//! External indexer invocation.
//!
//! Runs `<executable> [<update_flag>] <partition path>` to completion with stdin
//! closed and both output streams captured, e.g. `createrepo --update /srv/repo/storage/7/x86_64`.

use super::types::{Indexer, IndexerError, IndexerOutput};
use crate::coordinator::types::PartitionId;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

#[derive(Debug, Clone)]
pub struct CommandIndexer {
    executable: PathBuf,
    update_flag: String,
}

impl CommandIndexer {
    pub fn new(executable: impl Into<PathBuf>, update_flag: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            update_flag: update_flag.into(),
        }
    }

    fn command(&self, path: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        if !self.update_flag.is_empty() {
            cmd.arg(&self.update_flag);
        }
        cmd.arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Indexer for CommandIndexer {
    async fn rebuild(&self, partition: &PartitionId, path: &Path) -> Result<IndexerOutput, IndexerError> {
        tracing::debug!(
            partition = %partition,
            "Running {} {} {}",
            self.executable.display(),
            self.update_flag,
            path.display()
        );

        let started = Instant::now();
        let output = self
            .command(path)
            .output()
            .await
            .map_err(|source| IndexerError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(IndexerError::ExitStatus {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(IndexerOutput {
            stdout,
            stderr,
            elapsed: started.elapsed(),
        })
    }
}
