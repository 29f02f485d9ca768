//! Coordinator Context
//!
//! The single object shared between the ingestion handlers, the debounce gate and
//! the update worker. It is constructed once in `main` and passed around as an
//! `Arc<Coordinator>`; the queue and the signals below are the only state those
//! three activities share.

use super::gate::DebounceGate;
use super::queue::PendingTargetQueue;
use super::shutdown::ShutdownCoordinator;
use super::signal::Signal;
use super::types::*;
use super::worker::UpdateWorker;
use crate::indexer::types::Indexer;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct Coordinator {
    pub(super) queue: PendingTargetQueue,
    /// Set by every successful upload; consumed by the gate.
    pub(super) arrival: Signal,
    /// Set by the gate when the quiet period elapses; cleared by the worker after a full drain.
    pub(super) rebuild_ready: Signal,
    /// Terminal. Once cancelled it is never reset.
    pub(super) shutdown: CancellationToken,
    pub(super) stats: CoordinatorStats,
    pub(super) settings: CoordinatorSettings,
}

impl Coordinator {
    pub fn new(settings: CoordinatorSettings) -> Arc<Self> {
        Arc::new(Self {
            queue: PendingTargetQueue::new(),
            arrival: Signal::new(),
            rebuild_ready: Signal::new(),
            shutdown: CancellationToken::new(),
            stats: CoordinatorStats::default(),
            settings,
        })
    }

    /// Records that an artifact was placed into `partition`.
    ///
    /// Queues the partition if it is not already waiting and (re)starts the quiet
    /// period. Never blocks on a rebuild. Returns `true` if the partition was newly queued.
    pub fn submit(&self, partition: PartitionId) -> bool {
        let added = self.queue.enqueue_unique(partition.clone());
        self.stats.arrivals.fetch_add(1, Ordering::Relaxed);
        self.arrival.set();

        if added {
            tracing::info!(partition = %partition, "Queued partition for index rebuild");
        } else {
            tracing::debug!(partition = %partition, "Partition already queued, restarting quiet period");
        }

        added
    }

    /// Spawns the debounce gate and the update worker.
    ///
    /// The returned handle is the only way to stop them.
    pub fn start(self: &Arc<Self>, indexer: Arc<dyn Indexer>) -> ShutdownCoordinator {
        tracing::info!(
            quiet_period = ?self.settings.quiet_period,
            policy = ?self.settings.shutdown_policy,
            "Starting rebuild coordinator"
        );

        let gate = DebounceGate::new(self.clone());
        let gate_handle = tokio::spawn(gate.run());

        let worker = UpdateWorker::new(self.clone(), indexer);
        let worker_handle = tokio::spawn(worker.run());

        ShutdownCoordinator::new(self.shutdown.clone(), gate_handle, worker_handle)
    }

    pub fn queue(&self) -> &PendingTargetQueue {
        &self.queue
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}
