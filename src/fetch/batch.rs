use super::source::ListingSource;
use super::types::{ListCursor, Page};
use crate::error::{ExportError, Result};
use log::debug;

/// Fetches a library one bounded page at a time.
///
/// The fetcher remembers the continuation link returned with each page so successive calls
/// walk forward through the listing. Once the server stops handing out a link the cursor is
/// exhausted and every further call returns an empty page without a round trip.
#[derive(Debug)]
pub struct BatchFetcher<'a> {
    library: &'a str,
    page_size: usize,
    cursor: ListCursor,
}

impl<'a> BatchFetcher<'a> {
    /// Creates a fetcher for `library`. `page_size` must be positive.
    pub fn new(library: &'a str, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(ExportError::Config("page size must be positive".to_string()));
        }
        Ok(Self {
            library,
            page_size,
            cursor: ListCursor::Start,
        })
    }

    pub fn cursor(&self) -> &ListCursor {
        &self.cursor
    }

    /// Fetches the next page, holding at most `page_size` records.
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The next page; empty when the listing is exhausted.
    /// * `Err(ExportError::Fetch)` - The listing call failed, or the server ignored the page bound.
    pub async fn fetch<S: ListingSource + ?Sized>(&mut self, source: &S) -> Result<Page> {
        let continuation = match &self.cursor {
            ListCursor::Start => None,
            ListCursor::Next(link) => Some(link.as_str()),
            ListCursor::Exhausted => {
                debug!("Listing of '{}' exhausted, skipping request", self.library);
                return Ok(Page::default());
            }
        };

        let mut page = source
            .list_items(self.library, self.page_size, continuation)
            .await?;
        if page.len() > self.page_size {
            return Err(ExportError::Fetch {
                library: self.library.to_string(),
                message: format!(
                    "server returned {} items for a page of {}",
                    page.len(),
                    self.page_size
                ),
            });
        }

        self.cursor = match page.next_link.take() {
            Some(link) => ListCursor::Next(link),
            None => ListCursor::Exhausted,
        };
        Ok(page)
    }
}
