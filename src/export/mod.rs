//! Tools for writing exported rows to a tabular destination.
//!
//! This module defines the [`RowSink`] seam used by the pagination driver and its Excel
//! implementation. A sink receives the header once and then one batch of rows per fetched
//! page, always appended below what is already there.
//!
//! ## Usage
//!
//! [`XlsxSink::create`] prepares a workbook for a path; the driver calls
//! [`RowSink::write_header`] and then [`RowSink::append_rows`] per batch.
//!
//! ## Submodules
//!
//! - **sink**: The `RowSink` trait.
//! - **xlsx**: Excel workbook output.

mod sink;
mod xlsx;

pub use sink::RowSink;
pub use xlsx::XlsxSink;
