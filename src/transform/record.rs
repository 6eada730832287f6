use super::types::OutputRow;
use crate::error::TransformError;
use crate::fetch::SourceRecord;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

/// Transforms one listing record into an output row.
///
/// The mapping is pure. Any missing or malformed field fails the whole record; the error
/// carries the file name once it has been read so callers can report which file was skipped.
///
/// # Arguments
///
/// * `record` - A record from a fetched page.
///
/// # Returns
///
/// * `Ok(OutputRow)` - The flattened row.
/// * `Err(TransformError)` - The record cannot be represented as a row.
///
/// # Examples
///
/// ```rust
/// use library_export::fetch::{Identity, SourceRecord};
/// use library_export::transform::transform_record;
///
/// let author = Identity { email: Some("alice@example.com".to_string()) };
/// let record = SourceRecord {
///     file_leaf_ref: Some("Budget.xlsx".to_string()),
///     file_ref: Some("/sites/finance/Shared Documents/Budget.xlsx".to_string()),
///     file_size: Some(serde_json::json!("3145728")),
///     author: Some(author.clone()),
///     editor: Some(author),
///     created: Some("2024-01-02T03:04:05Z".to_string()),
///     modified: Some("2024-01-02T03:04:05Z".to_string()),
/// };
/// let row = transform_record(&record).unwrap();
/// assert_eq!(row.file_size_mb, 3.0);
/// assert_eq!(row.file_extension, ".xlsx");
/// ```
pub fn transform_record(record: &SourceRecord) -> Result<OutputRow, TransformError> {
    let file_name = record
        .file_leaf_ref
        .clone()
        .ok_or_else(|| TransformError::new(None, "file name (FileLeafRef) is missing"))?;
    let fail = |cause: String| TransformError::new(Some(file_name.clone()), cause);

    let file_path = record
        .file_ref
        .clone()
        .ok_or_else(|| fail("file path (FileRef) is missing".to_string()))?;
    let size_bytes = size_in_bytes(record.file_size.as_ref()).map_err(&fail)?;
    let author = record
        .author
        .as_ref()
        .ok_or_else(|| fail("author identity is missing".to_string()))?;
    let editor = record
        .editor
        .as_ref()
        .ok_or_else(|| fail("editor identity is missing".to_string()))?;
    let created_date = parse_timestamp(record.created.as_deref(), "Created").map_err(&fail)?;
    let modified_date = parse_timestamp(record.modified.as_deref(), "Modified").map_err(&fail)?;

    Ok(OutputRow {
        file_size_mb: bytes_to_megabytes(size_bytes),
        file_extension: file_extension(&file_name).to_string(),
        file_name,
        file_path,
        created_by_email: author.email.clone(),
        created_date,
        modified_by_email: editor.email.clone(),
        modified_date,
    })
}

/// Converts a byte count to megabytes rounded to two decimal places.
///
/// Midpoints round to the even neighbour (0.125 MB becomes 0.12, 0.375 MB becomes 0.38).
pub fn bytes_to_megabytes(bytes: u64) -> f64 {
    let megabytes = bytes as f64 / BYTES_PER_MEGABYTE;
    (megabytes * 100.0).round_ties_even() / 100.0
}

/// Returns the last dot-delimited suffix of `file_name`, leading dot included.
///
/// Names without a dot, or ending in one, have no extension.
pub fn file_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx + 1 < file_name.len() => &file_name[idx..],
        _ => "",
    }
}

fn size_in_bytes(value: Option<&Value>) -> Result<u64, String> {
    match value {
        None => Err("file size is missing".to_string()),
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| format!("file size {} is not a whole number of bytes", n)),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| format!("file size '{}' is not a number: {}", s, e)),
        Some(other) => Err(format!("file size has unexpected value {}", other)),
    }
}

fn parse_timestamp(value: Option<&str>, field: &str) -> Result<DateTime<Utc>, String> {
    let value = value.ok_or_else(|| format!("{} timestamp is missing", field))?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Some gateways drop the offset; those values are UTC.
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid {} timestamp '{}': {}", field, value, e))
}
