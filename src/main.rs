//! Library Export: Page Through a SharePoint Document Library into an Excel Workbook
//!
//! This application lists every file in a SharePoint document library, 5000 items at a time
//! by default, flattens each file's metadata (name, size, extension, path, author, editor,
//! timestamps) into a row, and appends each batch to an `.xlsx` workbook as it goes.
//!
//! ## Design Overview
//! - **Fetching**: Lists bounded pages from the SharePoint REST API via the `fetch` module.
//! - **Transforming**: Flattens records into rows, skipping malformed ones, via `transform`.
//! - **Exporting**: Appends each batch to the workbook via the `export` module.
//! - **Pipeline**: `pipeline::run_export` owns the loop, the stop rule and teardown.
//!
//! ## Usage
//! 1. Obtain an access token for the site and export it:
//!    ```sh
//!    export SHAREPOINT_ACCESS_TOKEN=eyJ0eXAi...
//!    ```
//! 2. Run the application, passing any of the values up front:
//!    ```sh
//!    cargo run -- --site-url https://contoso.sharepoint.com/sites/finance --library "Shared Documents" --log-file export --output-file files
//!    ```
//!    Values left out (site URL, library, log file, output file) are asked for interactively.
//!    `.txt` and `.xlsx` are appended to the log and output names when missing.
//! 3. Every log line is written as `yyyy-MM-dd HH:mm:ss - message` to the log file and to the
//!    console. `RUST_LOG=debug` adds request-level detail.

use anyhow::Context;
use clap::Parser;
use library_export::config::{ConfigInput, ExportConfig};
use library_export::export::XlsxSink;
use library_export::fetch::SharePointClient;
use library_export::pipeline::{run_export, DEFAULT_PAGE_SIZE};
use library_export::utils::init_logging;
use log::info;
use std::io;

/// Command-line arguments for configuring the exporter.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
  /// SharePoint site URL (e.g., "https://contoso.sharepoint.com/sites/finance").
  #[clap(long, env = "SITE_URL")]
  site_url: Option<String>,

  /// Title of the document library to export (e.g., "Shared Documents").
  #[clap(long, env = "LIBRARY")]
  library: Option<String>,

  /// Log file name; ".txt" is appended when missing.
  #[clap(long, env = "LOG_FILE")]
  log_file: Option<String>,

  /// Output workbook name; ".xlsx" is appended when missing.
  #[clap(long, env = "OUTPUT_FILE")]
  output_file: Option<String>,

  /// Number of items requested per listing call.
  #[clap(long, env = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
  page_size: usize,

  /// Bearer token used to authenticate against the site.
  #[clap(long, env = "SHAREPOINT_ACCESS_TOKEN", hide_env_values = true)]
  access_token: String,
}

/// Resolves configuration, installs logging, and runs the export.
///
/// # Returns
/// - `Ok(())` if every page was exported.
/// - `Err(anyhow::Error)` if configuration, connection, fetching or writing failed. Batches
///   written before a failure remain in the workbook.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let args = Args::parse();

  let config = {
    let input = ConfigInput {
      site_url: args.site_url,
      library: args.library,
      log_file: args.log_file,
      output_file: args.output_file,
      page_size: Some(args.page_size),
    };
    let mut reader = io::stdin().lock();
    let mut writer = io::stdout();
    ExportConfig::resolve(input, &mut reader, &mut writer).context("Invalid configuration")?
  };

  init_logging(&config.log_file).context("Failed to initialise logging")?;
  info!(
    "Exporting '{}' from {} to {}",
    config.library,
    config.site_url,
    config.output_file.display()
  );

  let mut source = SharePointClient::new(&config.site_url, args.access_token)
    .context("Failed to create SharePoint client")?;
  let mut sink = XlsxSink::create(&config.output_file).context("Failed to prepare workbook")?;

  let summary = run_export(&mut source, &mut sink, &config.export_options())
    .await
    .context("Export failed")?;
  info!(
    "Exported {} rows from {} items in {} pages ({} skipped) to {}",
    summary.rows_written,
    summary.records_fetched,
    summary.pages_fetched,
    summary.records_skipped,
    sink.path().display()
  );

  Ok(())
}
