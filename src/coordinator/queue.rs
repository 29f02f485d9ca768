//! Pending-Target Queue
//!
//! A FIFO of partitions waiting for an index rebuild. A partition appears at most
//! once while queued: uploads into an already-queued partition leave the queue
//! untouched. Every operation takes the same lock, so "insert if absent" is atomic
//! with respect to concurrent uploads and to the worker's dequeue.

use super::types::PartitionId;

use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
struct Inner {
    order: VecDeque<PartitionId>,
    members: HashSet<PartitionId>,
}

#[derive(Debug, Default)]
pub struct PendingTargetQueue {
    inner: Mutex<Inner>,
}

impl PendingTargetQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `partition` unless it is already queued.
    ///
    /// Returns `true` if the partition was newly added.
    pub fn enqueue_unique(&self, partition: PartitionId) -> bool {
        let mut inner = self.inner.lock();
        if !inner.members.insert(partition.clone()) {
            return false;
        }
        inner.order.push_back(partition);
        true
    }

    /// Removes and returns the oldest queued partition.
    pub fn dequeue_next(&self) -> Option<PartitionId> {
        let mut inner = self.inner.lock();
        let partition = inner.order.pop_front()?;
        inner.members.remove(&partition);
        Some(partition)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().order.len()
    }

    /// Queued partitions in processing order.
    pub fn snapshot(&self) -> Vec<PartitionId> {
        self.inner.lock().order.iter().cloned().collect()
    }

    /// Empties the queue, returning how many entries were dropped.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        let dropped = inner.order.len();
        inner.order.clear();
        inner.members.clear();
        dropped
    }
}
