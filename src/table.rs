//! Loading tables of untyped records from JSON.
//!
//! A table is a JSON array of objects. Anything else is rejected with a parse
//! error, wrapped in context naming the source.

use crate::Row;
use crate::error::{Result, ResultExt as _};
use std::path::Path;
use tracing::debug;

/// Decodes a JSON array of row objects.
///
/// # Errors
///
/// Returns [`Parse`](crate::error::DatalensError::Parse) when the text is not
/// valid JSON or any element is not an object.
pub fn parse_rows(text: &str) -> Result<Vec<Row>> {
    Ok(serde_json::from_str(text)?)
}

/// Reads and decodes a table file.
///
/// # Arguments
/// * `path` - file holding a JSON array of row objects
///
/// # Returns
/// The rows in file order.
///
/// # Errors
///
/// Returns [`Context`](crate::error::DatalensError::Context) wrapping the I/O
/// or parse failure.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let rows = parse_rows(&content)
        .with_context(|| format!("{} is not a JSON array of objects", path.display()))?;
    debug!(rows = rows.len(), path = %path.display(), "Table loaded");
    Ok(rows)
}
