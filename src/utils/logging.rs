use crate::error::{ExportError, Result};
use chrono::{DateTime, Local};
use env_logger::{Env, Target};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Timestamp layout used at the start of every log line.
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Formats one log line as `"<yyyy-MM-dd HH:mm:ss> - <message>"`.
pub fn format_entry(timestamp: &DateTime<Local>, message: &dyn std::fmt::Display) -> String {
    format!("{} - {}", timestamp.format(LOG_TIMESTAMP_FORMAT), message)
}

/// Installs the global logger.
///
/// Every record is appended to `log_file` (created if needed, never truncated) and echoed
/// to standard output. The level defaults to `info` and can be overridden through
/// `RUST_LOG`.
pub fn init_logging(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    let writer = TeeWriter::new(file, io::stdout());

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", format_entry(&Local::now(), record.args())))
        .target(Target::Pipe(Box::new(writer)))
        .try_init()
        .map_err(|e| ExportError::Config(format!("failed to install logger: {}", e)))
}

/// Writes everything to a primary sink and mirrors it to a second one.
///
/// The primary sink is authoritative: its errors are returned. Mirror failures (e.g., a
/// closed terminal) are ignored.
pub struct TeeWriter<P, M> {
    primary: P,
    mirror: M,
}

impl<P: Write, M: Write> TeeWriter<P, M> {
    pub fn new(primary: P, mirror: M) -> Self {
        Self { primary, mirror }
    }
}

impl<P: Write, M: Write> Write for TeeWriter<P, M> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        let _ = self.mirror.write_all(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        let _ = self.mirror.flush();
        Ok(())
    }
}
