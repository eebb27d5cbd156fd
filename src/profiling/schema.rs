//! Schema assembly: one [`ColumnSchema`] per column plus a readable digest.

use super::inference::infer_column_type;
use super::stats::statistics_for;
use super::types::{ColumnSchema, ColumnType, DataSchema, NO_DATA_SUMMARY};
use super::value::{format_float, is_empty_cell, percentage, round_half_up, value_key};
use crate::Row;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

pub const SAMPLE_VALUE_LIMIT: usize = 5;

/// Discovers the schema of an untyped table.
///
/// Columns are taken from the keys of the first row, in order. An empty table
/// yields [`DataSchema::empty`] rather than an error.
pub fn discover_schema(rows: &[Row]) -> DataSchema {
    let Some(first) = rows.first() else {
        debug!("No rows supplied, returning empty schema");
        return DataSchema::empty();
    };

    let columns: Vec<ColumnSchema> = first
        .keys()
        .map(|name| profile_column(name, rows))
        .collect();
    let summary = render_summary(&columns);

    info!(
        rows = rows.len(),
        columns = columns.len(),
        "Schema discovered"
    );

    DataSchema {
        total_rows: rows.len(),
        total_columns: columns.len(),
        columns,
        summary,
    }
}

fn profile_column(name: &str, rows: &[Row]) -> ColumnSchema {
    let cells: Vec<Option<&Value>> = rows.iter().map(|row| row.get(name)).collect();

    let null_count = cells.iter().filter(|cell| is_empty_cell(**cell)).count();
    let (unique_count, sample_values) = distinct_values(&cells);
    let column_type = infer_column_type(&cells);
    let statistics = statistics_for(column_type, &cells);

    debug!(
        column = name,
        column_type = %column_type,
        null_count,
        unique_count,
        "Column profiled"
    );

    ColumnSchema {
        name: name.to_owned(),
        column_type,
        null_percentage: round_half_up(percentage(null_count, rows.len()), 1),
        unique_count,
        sample_values,
        statistics,
    }
}

/// Distinct non-empty values: their count and the first few in row order.
fn distinct_values(cells: &[Option<&Value>]) -> (usize, Vec<Value>) {
    let mut seen = HashSet::new();
    let mut samples = Vec::new();

    for value in cells.iter().copied().flatten() {
        if is_empty_cell(Some(value)) {
            continue;
        }
        if seen.insert(value_key(value)) && samples.len() < SAMPLE_VALUE_LIMIT {
            samples.push(value.clone());
        }
    }

    (seen.len(), samples)
}

/// One line per column: `• name: type (range) [x% nulls] [k unique]`.
///
/// The range appears when statistics carry one, the null segment when any
/// cell is empty, and the unique segment for categorical and text columns.
pub fn render_summary(columns: &[ColumnSchema]) -> String {
    if columns.is_empty() {
        return NO_DATA_SUMMARY.to_owned();
    }

    columns
        .iter()
        .map(summary_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn summary_line(column: &ColumnSchema) -> String {
    let mut line = format!("• {}: {}", column.name, column.column_type);

    if let Some(range) = column.range() {
        line.push_str(&format!(" ({range})"));
    }
    if column.null_percentage > 0.0 {
        line.push_str(&format!(
            " [{}% nulls]",
            format_float(column.null_percentage)
        ));
    }
    if matches!(
        column.column_type,
        ColumnType::Categorical | ColumnType::Text
    ) {
        line.push_str(&format!(" [{} unique]", column.unique_count));
    }

    line
}
