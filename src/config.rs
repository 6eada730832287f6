//! Run configuration resolved from command-line values and interactive prompts.

use crate::error::{ExportError, Result};
use crate::pipeline::{ExportOptions, DEFAULT_PAGE_SIZE};
use crate::utils::{ensure_extension, value_or_prompt};
use std::io::{BufRead, Write};
use std::path::PathBuf;

pub const LOG_EXTENSION: &str = ".txt";
pub const OUTPUT_EXTENSION: &str = ".xlsx";

/// Values gathered from flags or the environment; any may be missing.
#[derive(Debug, Clone, Default)]
pub struct ConfigInput {
    pub site_url: Option<String>,
    pub library: Option<String>,
    pub log_file: Option<String>,
    pub output_file: Option<String>,
    pub page_size: Option<usize>,
}

/// Fully resolved settings for one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    pub site_url: String,
    pub library: String,
    pub log_file: PathBuf,
    pub output_file: PathBuf,
    pub page_size: usize,
}

impl ExportConfig {
    /// Fills in missing values by prompting, in the order site URL, library, log file,
    /// output file, and normalizes the file extensions.
    pub fn resolve<R: BufRead, W: Write>(
        input: ConfigInput,
        reader: &mut R,
        writer: &mut W,
    ) -> Result<Self> {
        let page_size = input.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(ExportError::Config("page size must be positive".to_string()));
        }

        let site_url = value_or_prompt(input.site_url, "SharePoint site URL", reader, writer)?;
        if !site_url.starts_with("https://") && !site_url.starts_with("http://") {
            return Err(ExportError::Config(format!(
                "site URL must start with http:// or https://, got '{}'",
                site_url
            )));
        }
        let library = value_or_prompt(input.library, "Document library name", reader, writer)?;
        let log_file = value_or_prompt(input.log_file, "Log file name", reader, writer)?;
        let output_file = value_or_prompt(input.output_file, "Output file name", reader, writer)?;

        Ok(Self {
            site_url,
            library,
            log_file: PathBuf::from(ensure_extension(&log_file, LOG_EXTENSION)),
            output_file: PathBuf::from(ensure_extension(&output_file, OUTPUT_EXTENSION)),
            page_size,
        })
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            library: self.library.clone(),
            page_size: self.page_size,
        }
    }
}
