//! # Paginated Export Pipeline
//!
//! Drives the fetch → transform → append loop: one bounded page at a time, one appended
//! batch per page, per-record failures isolated, and the remote session released on every
//! exit path.

mod driver;

pub use driver::{run_export, ExportOptions, ExportSummary, DEFAULT_PAGE_SIZE};
