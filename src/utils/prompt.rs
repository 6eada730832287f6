use crate::error::{ExportError, Result};
use std::io::{BufRead, Write};

/// Returns `value` if present, otherwise asks for it on `output` and reads one line.
///
/// Surrounding whitespace is trimmed. An empty answer, or end of input, is an error.
pub fn value_or_prompt<R: BufRead, W: Write>(
    value: Option<String>,
    label: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    if let Some(value) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        return Ok(value);
    }

    write!(output, "{}: ", label)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(ExportError::Config(format!("{} is required", label)));
    }
    Ok(answer.to_string())
}
