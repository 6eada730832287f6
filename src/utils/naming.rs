/// Appends `extension` (e.g., ".xlsx") to `file_name` unless it already ends with it.
///
/// The comparison ignores ASCII case, so "Report.XLSX" is left alone.
///
/// # Examples
///
/// ```rust
/// use library_export::utils::ensure_extension;
/// assert_eq!(ensure_extension("files", ".xlsx"), "files.xlsx");
/// assert_eq!(ensure_extension("files.xlsx", ".xlsx"), "files.xlsx");
/// ```
pub fn ensure_extension(file_name: &str, extension: &str) -> String {
    let has_extension = file_name.len() >= extension.len()
        && file_name.is_char_boundary(file_name.len() - extension.len())
        && file_name[file_name.len() - extension.len()..].eq_ignore_ascii_case(extension);
    if has_extension {
        file_name.to_string()
    } else {
        format!("{}{}", file_name, extension)
    }
}
