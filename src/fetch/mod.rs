//! # Fetching Document Library Items
//!
//! This module lists the files of a remote document library one bounded page at a time.
//! Listing responses are deserialized straight into typed [`SourceRecord`] values, with the
//! nullable user lookups (`Author`, `Editor`) kept as explicit options.
//!
//! ## Usage
//!
//! [`ListingSource`] is the seam to the remote system; [`SharePointClient`] implements it
//! over the SharePoint REST API. [`BatchFetcher`] wraps a source with the page-size bound and
//! threads the server's continuation link from one call to the next.
//!
//! ## Submodules
//!
//! - **batch**: Page-size bounded fetching with a continuation cursor.
//! - **sharepoint**: REST client for SharePoint document libraries.
//! - **source**: The `ListingSource` trait.
//! - **types**: Records, pages and the cursor.

mod batch;
mod sharepoint;
mod source;
mod types;

pub use batch::BatchFetcher;
pub use sharepoint::SharePointClient;
pub use source::ListingSource;
pub use types::{Identity, ListCursor, Page, SourceRecord};
