//! In-memory doubles for the listing source and the row sink, plus a log capture.

use crate::error::{ExportError, Result};
use crate::export::RowSink;
use crate::fetch::{Identity, ListingSource, Page, SourceRecord};
use crate::transform::OutputRow;
use async_trait::async_trait;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

/// Builds a well-formed record for item `index`.
pub fn record(index: usize) -> SourceRecord {
    let name = format!("file-{:05}.docx", index);
    SourceRecord {
        file_ref: Some(format!("/sites/docs/Shared Documents/{}", name)),
        file_leaf_ref: Some(name),
        file_size: Some(json!((index * 1024).to_string())),
        author: Some(Identity {
            email: Some("alice@example.com".to_string()),
        }),
        editor: Some(Identity {
            email: Some("bob@example.com".to_string()),
        }),
        created: Some("2024-01-02T03:04:05Z".to_string()),
        modified: Some("2024-02-03T04:05:06Z".to_string()),
    }
}

pub fn records(count: usize) -> Vec<SourceRecord> {
    (0..count).map(record).collect()
}

/// A library held in memory as raw listing items. Continuation links are item offsets.
///
/// A link is handed out whenever a page comes back full, so a library whose size is a
/// multiple of the page size ends with one empty page.
#[derive(Default)]
pub struct MemorySource {
    pub items: Vec<Value>,
    /// 1-based listing call that fails.
    pub fail_on_call: Option<usize>,
    pub fail_connect: bool,
    pub fail_disconnect: bool,
    pub connected: bool,
    pub disconnect_attempts: usize,
    pub list_calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(records: Vec<SourceRecord>) -> Self {
        let items = records
            .iter()
            .map(|record| serde_json::to_value(record).unwrap())
            .collect();
        Self {
            items,
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for MemorySource {
    async fn connect(&mut self) -> Result<()> {
        if self.fail_connect {
            return Err(ExportError::Connection {
                site: "memory://library".to_string(),
                message: "access denied".to_string(),
            });
        }
        self.connected = true;
        Ok(())
    }

    async fn list_items(
        &self,
        library: &str,
        page_size: usize,
        continuation: Option<&str>,
    ) -> Result<Page> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(ExportError::Fetch {
                library: library.to_string(),
                message: "the attempted operation is prohibited because it exceeds the list view threshold".to_string(),
            });
        }
        let offset = continuation.map_or(0, |link| link.parse::<usize>().unwrap());
        let start = offset.min(self.items.len());
        let end = (offset + page_size).min(self.items.len());
        let items = self.items[start..end].to_vec();
        let next_link = (items.len() == page_size).then(|| end.to_string());
        Ok(Page { items, next_link })
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.disconnect_attempts += 1;
        if self.fail_disconnect {
            return Err(ExportError::Disconnect("session already closed".to_string()));
        }
        self.connected = false;
        Ok(())
    }
}

/// Collects appended batches in memory.
#[derive(Default)]
pub struct MemorySink {
    pub header_writes: usize,
    pub batches: Vec<Vec<OutputRow>>,
    /// 1-based append call that fails.
    pub fail_on_append: Option<usize>,
    pub append_calls: usize,
}

impl MemorySink {
    pub fn rows(&self) -> Vec<&OutputRow> {
        self.batches.iter().flatten().collect()
    }
}

impl RowSink for MemorySink {
    fn write_header(&mut self) -> Result<()> {
        self.header_writes += 1;
        self.batches.clear();
        Ok(())
    }

    fn append_rows(&mut self, rows: &[OutputRow]) -> Result<()> {
        self.append_calls += 1;
        if self.fail_on_append == Some(self.append_calls) {
            return Err(ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.batches.push(rows.to_vec());
        Ok(())
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

/// Records log lines per thread so concurrently running tests do not see each other's output.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if !record.target().starts_with("library_export") {
            return;
        }
        let line = record.args().to_string();
        CAPTURED.with(|lines| lines.borrow_mut().push((record.level(), line)));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

/// Starts capturing this thread's log lines, dropping anything captured before.
///
/// `#[tokio::test]` runs on a current-thread runtime, so everything the test awaits logs on
/// the test's own thread.
pub fn capture_logs() {
    INSTALL.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
    CAPTURED.with(|lines| lines.borrow_mut().clear());
}

pub fn captured_logs() -> Vec<(Level, String)> {
    CAPTURED.with(|lines| lines.borrow().clone())
}

/// Captured lines at `level` that contain `needle`.
pub fn logged(level: Level, needle: &str) -> Vec<String> {
    captured_logs()
        .into_iter()
        .filter(|(l, line)| *l == level && line.contains(needle))
        .map(|(_, line)| line)
        .collect()
}
