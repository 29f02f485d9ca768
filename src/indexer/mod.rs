//! Repository Indexer Module
//!
//! The boundary to the external tool (`createrepo` by default) that regenerates a
//! partition's repository metadata from the packages it contains.
//!
//! ## Submodules
//! - **`types`**: the `Indexer` trait, its output and error types.
//! - **`command`**: the process-backed implementation used in production.

pub mod command;
pub mod types;

pub use command::CommandIndexer;
pub use types::{Indexer, IndexerError, IndexerOutput};

#[cfg(test)]
mod tests;
