use super::types::Page;
use crate::error::Result;
use async_trait::async_trait;

/// A remote collection that can be listed page by page.
///
/// The export driver acquires the session with [`connect`](ListingSource::connect) once,
/// lists pages until it decides to stop, and always calls
/// [`disconnect`](ListingSource::disconnect) afterwards, whatever the outcome.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Establishes the session. Failures map to [`ExportError::Connection`](crate::error::ExportError::Connection).
    async fn connect(&mut self) -> Result<()>;

    /// Lists at most `page_size` items of `library`.
    ///
    /// `continuation` is the link returned with the previous page, or `None` for the first
    /// request. Failures map to [`ExportError::Fetch`](crate::error::ExportError::Fetch).
    async fn list_items(
        &self,
        library: &str,
        page_size: usize,
        continuation: Option<&str>,
    ) -> Result<Page>;

    /// Releases the session.
    async fn disconnect(&mut self) -> Result<()>;
}
