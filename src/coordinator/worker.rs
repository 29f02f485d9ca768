//! Update Worker
//!
//! Waits for the gate's rebuild request and then drains the pending-target queue,
//! running the indexer once per partition. Invocations are strictly sequential:
//! this task is the only caller of the indexer, and it awaits each run before
//! dequeuing the next partition.
//!
//! A failed invocation is logged and counted; the drain continues with the next
//! partition. Nothing is retried.

use super::context::Coordinator;
use super::types::{PartitionId, ShutdownPolicy};
use crate::indexer::types::Indexer;

use std::sync::atomic::Ordering;
use std::sync::Arc;

pub struct UpdateWorker {
    coordinator: Arc<Coordinator>,
    indexer: Arc<dyn Indexer>,
}

impl UpdateWorker {
    pub fn new(coordinator: Arc<Coordinator>, indexer: Arc<dyn Indexer>) -> Self {
        Self {
            coordinator,
            indexer,
        }
    }

    pub async fn run(self) {
        tracing::info!("Update worker started");
        let c = self.coordinator.clone();

        loop {
            tokio::select! {
                biased;
                _ = c.shutdown.cancelled() => break,
                _ = c.rebuild_ready.wait() => {}
            }

            self.drain().await;

            if c.shutdown.is_cancelled() {
                break;
            }
        }

        self.finish().await;
        tracing::info!("Update worker stopped");
    }

    /// Processes queued partitions until the queue stays empty.
    ///
    /// `rebuild_ready` is cleared only after the queue was seen empty, and the queue
    /// is checked once more after clearing: a partition queued in between is picked
    /// up now instead of waiting for the next burst.
    async fn drain(&self) {
        let c = &self.coordinator;

        loop {
            while let Some(partition) = self.next_target() {
                self.rebuild(&partition).await;
            }

            if c.shutdown.is_cancelled() {
                return;
            }

            if !c.queue.is_empty() {
                continue;
            }
            c.rebuild_ready.clear();
            if c.queue.is_empty() {
                return;
            }
        }
    }

    /// Next partition to rebuild, or `None` when the queue is empty or shutdown
    /// forbids starting another run.
    fn next_target(&self) -> Option<PartitionId> {
        let c = &self.coordinator;
        if c.shutdown.is_cancelled() && c.settings.shutdown_policy == ShutdownPolicy::Abandon {
            return None;
        }
        c.queue.dequeue_next()
    }

    async fn finish(&self) {
        let c = &self.coordinator;

        match c.settings.shutdown_policy {
            ShutdownPolicy::Drain => {
                let pending = c.queue.len();
                if pending > 0 {
                    tracing::info!(pending, "Draining queued partitions before exit");
                }
                while let Some(partition) = c.queue.dequeue_next() {
                    self.rebuild(&partition).await;
                }
            }
            ShutdownPolicy::Abandon => {
                let dropped = c.queue.clear();
                if dropped > 0 {
                    tracing::warn!(dropped, "Shutting down with partitions still queued");
                }
            }
        }
    }

    async fn rebuild(&self, partition: &PartitionId) {
        let c = &self.coordinator;
        let path = partition.path_under(&c.settings.repo_root);

        c.stats.invocations.fetch_add(1, Ordering::Relaxed);
        tracing::info!(partition = %partition, path = %path.display(), "Rebuilding index");

        match self.indexer.rebuild(partition, &path).await {
            Ok(output) => {
                if !output.stdout.trim().is_empty() {
                    tracing::debug!(partition = %partition, "indexer stdout:\n{}", output.stdout.trim_end());
                }
                if !output.stderr.trim().is_empty() {
                    tracing::warn!(partition = %partition, "indexer stderr:\n{}", output.stderr.trim_end());
                }
                tracing::info!(partition = %partition, elapsed = ?output.elapsed, "Index rebuilt");
            }
            Err(e) => {
                c.stats.failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(partition = %partition, "Index rebuild failed: {}", e);
            }
        }
    }
}
