use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Identifier of an independently indexable repository partition.
///
/// Rendered as `<os_release>/<arch>` (e.g. `7/x86_64`), which is also the
/// partition's path relative to the repository root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionId(pub String);

impl PartitionId {
    pub fn new(release: &str, arch: &str) -> Self {
        Self(format!("{}/{}", release, arch))
    }

    /// Directory handed to the indexer for this partition.
    pub fn path_under(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartitionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// State of the debounce gate. Owned by the gate task only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// No burst in progress; waiting for the first arrival.
    Idle,
    /// A burst is being timed; every arrival restarts the quiet period.
    Armed,
}

/// What the update worker does with queued partitions once shutdown is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownPolicy {
    /// Let a running indexer finish, start nothing new, drop the rest of the queue.
    #[default]
    Abandon,
    /// Rebuild every queued partition before exiting, skipping the quiet period.
    Drain,
}

/// Runtime parameters of the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    /// Quiet period `D` the gate waits after the last arrival.
    pub quiet_period: Duration,
    /// Upper bound on how long a burst may keep postponing its rebuild,
    /// measured from the burst's first arrival. `None` is pure debounce.
    pub max_delay: Option<Duration>,
    pub shutdown_policy: ShutdownPolicy,
    /// Repository root; partition paths are resolved below it.
    pub repo_root: PathBuf,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_secs(30),
            max_delay: None,
            shutdown_policy: ShutdownPolicy::Abandon,
            repo_root: PathBuf::from("/srv/repo/storage"),
        }
    }
}

/// Monotonic counters updated by the ingestion path, the gate and the worker.
#[derive(Debug, Default)]
pub struct CoordinatorStats {
    pub arrivals: AtomicU64,
    pub rebuilds_fired: AtomicU64,
    pub invocations: AtomicU64,
    pub failures: AtomicU64,
}

impl CoordinatorStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            arrivals: self.arrivals.load(Ordering::Relaxed),
            rebuilds_fired: self.rebuilds_fired.load(Ordering::Relaxed),
            invocations: self.invocations.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CoordinatorStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub arrivals: u64,
    pub rebuilds_fired: u64,
    pub invocations: u64,
    pub failures: u64,
}
