use crate::error::Result;
use crate::export::RowSink;
use crate::fetch::{BatchFetcher, ListingSource, SourceRecord};
use crate::transform::{transform_record, OutputRow};
use chrono::Local;
use log::{error, info, warn};
use serde_json::Value;

/// Default number of items requested per listing call, matching the SharePoint list view
/// threshold.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// What to export and how large each page may be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub library: String,
    pub page_size: usize,
}

impl ExportOptions {
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Counters for a completed export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Listing calls made, including a final empty page.
    pub pages_fetched: usize,
    pub records_fetched: usize,
    pub rows_written: usize,
    pub records_skipped: usize,
}

/// Exports every item of a library from `source` into `sink`.
///
/// The sink is cleared and given its header, the source is connected, and pages are then
/// fetched, transformed and appended one at a time. A page shorter than the page size is the
/// last one. Items that fail to decode or transform are logged and skipped; a failed listing call
/// ends the run without retrying. Whatever the outcome, the source is disconnected before
/// returning and the finishing time is logged.
///
/// # Arguments
///
/// * `source` - The remote collection, not yet connected.
/// * `sink` - Destination for the header and row batches.
/// * `options` - Library name and page size.
///
/// # Returns
///
/// * `Ok(ExportSummary)` - Every page was processed.
/// * `Err(ExportError)` - Connecting, fetching or writing failed. Batches appended before the
///   failure stay in the sink.
///
/// # Examples
///
/// ```rust,no_run
/// use library_export::export::XlsxSink;
/// use library_export::fetch::SharePointClient;
/// use library_export::pipeline::{run_export, ExportOptions};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut source = SharePointClient::new("https://contoso.sharepoint.com/sites/finance", "token")?;
///     let mut sink = XlsxSink::create("finance.xlsx")?;
///     let summary = run_export(&mut source, &mut sink, &ExportOptions::new("Shared Documents")).await?;
///     println!("{} rows written", summary.rows_written);
///     Ok(())
/// }
/// ```
pub async fn run_export<S, W>(
    source: &mut S,
    sink: &mut W,
    options: &ExportOptions,
) -> Result<ExportSummary>
where
    S: ListingSource + ?Sized,
    W: RowSink + ?Sized,
{
    info!(
        "Starting export of library '{}' with page size {}",
        options.library, options.page_size
    );
    let mut summary = ExportSummary::default();
    let outcome = drive(source, sink, options, &mut summary).await;
    teardown(source, outcome.is_ok()).await;
    outcome.map(|()| summary)
}

async fn drive<S, W>(
    source: &mut S,
    sink: &mut W,
    options: &ExportOptions,
    summary: &mut ExportSummary,
) -> Result<()>
where
    S: ListingSource + ?Sized,
    W: RowSink + ?Sized,
{
    let mut fetcher = BatchFetcher::new(&options.library, options.page_size)?;

    sink.write_header().map_err(|e| {
        error!("Error writing header to output: {}", e);
        e
    })?;
    source.connect().await.map_err(|e| {
        error!("Error connecting to remote source: {}", e);
        e
    })?;

    loop {
        let batch_number = summary.records_fetched / options.page_size + 1;
        info!(
            "Fetching batch {} (up to {} items)",
            batch_number, options.page_size
        );
        let page = fetcher.fetch(&*source).await.map_err(|e| {
            error!("Error fetching batch {}: {}", batch_number, e);
            e
        })?;
        summary.pages_fetched += 1;

        if page.is_empty() {
            info!("No more items to fetch");
            return Ok(());
        }

        let page_len = page.len();
        let (rows, skipped) = transform_batch(&page.items, batch_number);
        sink.append_rows(&rows).map_err(|e| {
            error!("Error appending batch {} to output: {}", batch_number, e);
            e
        })?;

        summary.records_fetched += page_len;
        summary.rows_written += rows.len();
        summary.records_skipped += skipped;
        info!(
            "Batch {} written: {} rows appended, {} skipped, {} items fetched so far",
            batch_number,
            rows.len(),
            skipped,
            summary.records_fetched
        );

        if page_len < options.page_size {
            info!("Batch {} was the last batch", batch_number);
            return Ok(());
        }
    }
}

/// Decodes and transforms a page in order, keeping successes and logging each failure.
fn transform_batch(items: &[Value], batch_number: usize) -> (Vec<OutputRow>, usize) {
    let mut rows = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match SourceRecord::try_from(item).and_then(|record| transform_record(&record)) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("Skipping item in batch {}: {}", batch_number, e);
                skipped += 1;
            }
        }
    }
    (rows, skipped)
}

async fn teardown<S: ListingSource + ?Sized>(source: &mut S, succeeded: bool) {
    if let Err(e) = source.disconnect().await {
        error!("Error while disconnecting: {}", e);
    }
    let finished_at = Local::now().format("%Y-%m-%d %H:%M:%S");
    if succeeded {
        info!("Export completed at {}", finished_at);
    } else {
        error!("Export terminated at {}", finished_at);
    }
}
