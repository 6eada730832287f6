use chrono::{DateTime, Utc};

/// Column headers of the output sheet, in write order.
pub const OUTPUT_HEADERS: [&str; 8] = [
    "FileName",
    "FileSizeMB",
    "FileExtension",
    "FilePath",
    "CreatedByEmail",
    "CreatedDate",
    "ModifiedByEmail",
    "ModifiedDate",
];

/// One flattened spreadsheet row describing a single file.
///
/// Field order matches [`OUTPUT_HEADERS`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub file_name: String,
    /// Size in megabytes, rounded to two decimal places.
    pub file_size_mb: f64,
    /// Extension including the leading dot, or empty.
    pub file_extension: String,
    pub file_path: String,
    pub created_by_email: Option<String>,
    pub created_date: DateTime<Utc>,
    pub modified_by_email: Option<String>,
    pub modified_date: DateTime<Utc>,
}
