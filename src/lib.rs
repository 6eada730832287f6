//! Library Export
//!
//! This library pages through a remote document library, flattens each file's metadata
//! into a spreadsheet row, and appends the rows batch by batch to an Excel workbook.
//!

pub mod config;
pub mod error;
pub mod export;
pub mod fetch;
pub mod pipeline;
pub mod transform;
pub mod utils;

#[cfg(test)]
mod testing;
