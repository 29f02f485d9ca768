//! Package Ingestion Module
//!
//! The HTTP front of the repository. A reverse proxy stores the uploaded request
//! body on disk and forwards a `PUT` whose header names the stored file.
//!
//! ## Workflow
//! 1. **Resolve**: read NAME, VERSION, RELEASE and ARCH from the package's RPM
//!    header (or parse its file name when it has none) and derive the target
//!    partition (`7/x86_64`).
//! 2. **Place**: move the file into `<top_dir>/<partition>/Packages/`.
//! 3. **Notify**: submit the partition to the `Coordinator` and answer immediately.
//!
//! A request that fails in steps 1 or 2 gets a non-2xx response and never touches
//! the rebuild queue.

pub mod handlers;
pub mod placement;
pub mod resolver;
pub mod rpm_header;
pub mod types;
