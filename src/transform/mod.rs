//! # Transforming Library Records into Spreadsheet Rows
//!
//! This module flattens each fetched [`SourceRecord`](crate::fetch::SourceRecord) into an
//! [`OutputRow`] with eight fixed columns. A record that cannot be flattened produces a
//! [`TransformError`](crate::error::TransformError) and no row; the caller decides whether
//! to skip it.
//!
//! ## Submodules
//!
//! - **record**: The per-record mapping and its numeric and naming helpers.
//! - **types**: The output row and its column headers.

mod record;
mod types;

pub use record::{bytes_to_megabytes, file_extension, transform_record};
pub use types::{OutputRow, OUTPUT_HEADERS};
