//! Structural completeness: missing values, empty columns, degenerate numerics.

use super::types::{Deductions, SubScore, ValidationFlag};
use crate::Row;
use crate::profiling::{ColumnType, DataSchema};
use crate::profiling::value::format_float;
use tracing::debug;

pub const NULL_CRITICAL_PCT: f64 = 50.0;
pub const NULL_CRITICAL_MAX_DEDUCTION: f64 = 20.0;
pub const NULL_WARNING_PCT: f64 = 20.0;
pub const NULL_WARNING_DEDUCTION: f64 = 5.0;
pub const EMPTY_COLUMN_DEDUCTION: f64 = 10.0;
pub const LOW_VARIETY_MAX_UNIQUE: usize = 3;
pub const LOW_VARIETY_MIN_ROWS: usize = 10;
pub const LOW_VARIETY_DEDUCTION: f64 = 5.0;

/// Scores completeness column by column.
///
/// # Arguments
/// * `rows` - the table being scored
/// * `schema` - the schema discovered from `rows`
///
/// # Returns
/// A sub-score starting at 100, less one deduction per flagged column.
pub fn score_structure(rows: &[Row], schema: &DataSchema) -> SubScore {
    let mut deductions = Deductions::default();

    for column in &schema.columns {
        let pct = column.null_percentage;
        if pct > NULL_CRITICAL_PCT {
            deductions.deduct(
                ValidationFlag::critical(
                    format!(
                        "Column '{}' is missing {}% of its values",
                        column.name,
                        format_float(pct)
                    ),
                    (pct / 5.0).min(NULL_CRITICAL_MAX_DEDUCTION),
                )
                .for_column(&column.name),
            );
        } else if pct > NULL_WARNING_PCT {
            deductions.deduct(
                ValidationFlag::warning(
                    format!(
                        "Column '{}' has {}% missing values",
                        column.name,
                        format_float(pct)
                    ),
                    NULL_WARNING_DEDUCTION,
                )
                .for_column(&column.name),
            );
        }
    }

    let empty_columns: Vec<&str> = schema
        .columns
        .iter()
        .filter(|c| c.is_fully_empty())
        .map(|c| c.name.as_str())
        .collect();
    if !empty_columns.is_empty() {
        deductions.deduct(ValidationFlag::critical(
            format!(
                "{} column(s) contain no values at all: {}",
                empty_columns.len(),
                empty_columns.join(", ")
            ),
            EMPTY_COLUMN_DEDUCTION * empty_columns.len() as f64,
        ));
    }

    if rows.len() > LOW_VARIETY_MIN_ROWS {
        for column in schema.columns_of(ColumnType::Numeric) {
            if column.unique_count < LOW_VARIETY_MAX_UNIQUE {
                deductions.deduct(
                    ValidationFlag::warning(
                        format!(
                            "Numeric column '{}' has only {} distinct value(s) across {} rows",
                            column.name,
                            column.unique_count,
                            rows.len()
                        ),
                        LOW_VARIETY_DEDUCTION,
                    )
                    .for_column(&column.name),
                );
            }
        }
    }

    let sub = deductions.finish();
    debug!(score = sub.score, flags = sub.flags.len(), "Structural score");
    sub
}
