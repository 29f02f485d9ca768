//! RPM Repository Update Helper Library
//!
//! Accepts uploaded packages into a repository tree partitioned by distribution
//! release and architecture, and keeps each partition's index in sync by running an
//! external indexer (`createrepo`).
//!
//! ## Architecture Modules
//! - **`ingestion`**: The HTTP upload endpoint. Resolves a package to its partition,
//!   moves it into place and reports the partition to the coordinator.
//! - **`coordinator`**: Debounces bursts of uploads into single rebuild requests and
//!   drains the queue of pending partitions, one indexer run at a time.
//! - **`indexer`**: The boundary to the external indexing executable.
//! - **`config`**: YAML settings, command line and built-in defaults.

pub mod config;
pub mod coordinator;
pub mod indexer;
pub mod ingestion;
