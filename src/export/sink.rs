use crate::error::Result;
use crate::transform::OutputRow;

/// An append-only tabular destination for exported rows.
///
/// `write_header` creates or clears the destination and leaves it holding only the header
/// row. Each `append_rows` call then adds one batch below the existing content, in order.
pub trait RowSink {
  fn write_header(&mut self) -> Result<()>;

  fn append_rows(&mut self, rows: &[OutputRow]) -> Result<()>;
}
