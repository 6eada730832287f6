//! # Utility Functions for the Exporter
//!
//! General helpers used by the binary and the pipeline.
//!
//! ## Submodules
//!
//! - **logging**: Timestamped log lines written to a file and mirrored to stdout.
//! - **naming**: File-name extension normalization.
//! - **prompt**: Interactive prompts for values not given on the command line.

mod logging;
mod naming;
mod prompt;

pub use logging::{format_entry, init_logging, TeeWriter, LOG_TIMESTAMP_FORMAT};
pub use naming::ensure_extension;
pub use prompt::value_or_prompt;
