//! Rebuild Coordination Module
//!
//! Decides *when* the repository indexer runs. Uploads are cheap and frequent; an
//! index rebuild is expensive and must never overlap with itself. This module sits
//! between the two.
//!
//! ## Data Flow
//! 1. **Submit**: the upload handler queues the target partition (deduplicated) and
//!    sets the `arrival` signal. It never waits for a rebuild.
//! 2. **Debounce**: the gate waits until no arrival has happened for the quiet period,
//!    restarting the countdown on every arrival, then sets `rebuild_ready` once.
//! 3. **Drain**: the worker wakes on `rebuild_ready`, rebuilds every queued partition
//!    one after another, and only then goes back to waiting.
//! 4. **Shutdown**: a cancellation token wakes both loops; the shutdown handle joins them.
//!
//! ## Submodules
//! - **`context`**: the shared `Coordinator` object (queue, signals, counters).
//! - **`queue`**: the deduplicating FIFO of partitions awaiting a rebuild.
//! - **`signal`**: set/clear/wait wake conditions.
//! - **`gate`**: the debounce state machine.
//! - **`worker`**: the sequential drain loop around the indexer.
//! - **`shutdown`**: stopping and joining the two background tasks.

pub mod context;
pub mod gate;
pub mod queue;
pub mod shutdown;
pub mod signal;
pub mod types;
pub mod worker;

pub use context::Coordinator;
pub use shutdown::{ShutdownCoordinator, ShutdownError};
pub use types::{CoordinatorSettings, PartitionId, ShutdownPolicy, StatsSnapshot};
