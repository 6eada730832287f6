use super::sink::RowSink;
use crate::error::Result;
use crate::transform::{OutputRow, OUTPUT_HEADERS};
use log::debug;
use rust_xlsxwriter::{Format, RowNum, Workbook, Worksheet};
use std::path::{Path, PathBuf};

const SHEET_NAME: &str = "Files";
const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Writes exported rows to a single-sheet Excel workbook.
///
/// The workbook is kept in memory and saved to disk after the header and after every
/// appended batch, so rows already appended survive a failure later in the run.
///
/// Each save rewrites the whole file, not just the new rows: a library of `n` pages costs
/// `n` full writes of a growing workbook, so total disk I/O grows quadratically with the
/// library size. Memory holds every row written so far.
///
/// # Examples
///
/// ```rust,no_run
/// use library_export::export::{RowSink, XlsxSink};
///
/// fn main() -> anyhow::Result<()> {
///   let mut sink = XlsxSink::create("files.xlsx")?;
///   sink.write_header()?;
///   sink.append_rows(&[])?;
///   Ok(())
/// }
/// ```
pub struct XlsxSink {
  path: PathBuf,
  workbook: Workbook,
  date_format: Format,
  next_row: RowNum,
}

impl XlsxSink {
  /// Prepares a workbook destined for `path`. Nothing touches the disk until
  /// [`write_header`](RowSink::write_header).
  pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
    let mut workbook = Workbook::new();
    workbook.add_worksheet().set_name(SHEET_NAME)?;
    Ok(Self {
      path: path.into(),
      workbook,
      date_format: Format::new().set_num_format(DATE_FORMAT),
      next_row: 0,
    })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Number of data rows written so far, header excluded.
  pub fn rows_written(&self) -> u32 {
    self.next_row.saturating_sub(1)
  }

  fn save(&mut self) -> Result<()> {
    self.workbook.save(&self.path)?;
    debug!("Saved {} ({} data rows)", self.path.display(), self.rows_written());
    Ok(())
  }
}

impl RowSink for XlsxSink {
  fn write_header(&mut self) -> Result<()> {
    let worksheet = self.workbook.worksheet_from_index(0)?;
    for (col, header) in OUTPUT_HEADERS.iter().enumerate() {
      worksheet.write_string(0, col as u16, *header)?;
    }
    self.next_row = 1;
    self.save()
  }

  fn append_rows(&mut self, rows: &[OutputRow]) -> Result<()> {
    if rows.is_empty() {
      return Ok(());
    }
    let worksheet = self.workbook.worksheet_from_index(0)?;
    for (offset, row) in rows.iter().enumerate() {
      write_row(worksheet, self.next_row + offset as RowNum, row, &self.date_format)?;
    }
    self.next_row += rows.len() as RowNum;
    self.save()
  }
}

/// Writes one row in `OUTPUT_HEADERS` order. Missing emails stay blank.
fn write_row(
  worksheet: &mut Worksheet,
  row_num: RowNum,
  row: &OutputRow,
  date_format: &Format,
) -> Result<()> {
  worksheet.write_string(row_num, 0, &row.file_name)?;
  worksheet.write_number(row_num, 1, row.file_size_mb)?;
  worksheet.write_string(row_num, 2, &row.file_extension)?;
  worksheet.write_string(row_num, 3, &row.file_path)?;
  if let Some(email) = &row.created_by_email {
    worksheet.write_string(row_num, 4, email)?;
  }
  worksheet.write_datetime_with_format(row_num, 5, &row.created_date.naive_utc(), date_format)?;
  if let Some(email) = &row.modified_by_email {
    worksheet.write_string(row_num, 6, email)?;
  }
  worksheet.write_datetime_with_format(row_num, 7, &row.modified_date.naive_utc(), date_format)?;
  Ok(())
}
