//! Row- and value-level anomalies: sparse rows, future dates, type mismatches.

use super::types::{Deductions, SubScore, ValidationFlag};
use crate::Row;
use crate::profiling::value::{is_empty_cell, parse_date_cell, parse_finite, percentage};
use crate::profiling::{ColumnSchema, ColumnType, DataSchema};
use chrono::NaiveDateTime;
use tracing::debug;

/// A row is sparse when more than this share (in tenths) of its fields are empty.
pub const SPARSE_ROW_TENTHS: usize = 3;
pub const SPARSE_ROWS_PCT_THRESHOLD: f64 = 20.0;
pub const SPARSE_ROWS_MAX_DEDUCTION: f64 = 25.0;
pub const FUTURE_DATES_PCT_THRESHOLD: f64 = 5.0;
pub const FUTURE_DATES_DEDUCTION: f64 = 10.0;
pub const TYPE_MISMATCH_PCT_THRESHOLD: f64 = 5.0;
pub const TYPE_MISMATCH_MAX_DEDUCTION: f64 = 15.0;

/// Scores anomalies relative to `now`, the evaluation time used to decide
/// which dates lie in the future.
///
/// # Arguments
/// * `rows` - the table being scored
/// * `schema` - the schema discovered from `rows`
/// * `now` - evaluation time for the future-date check
///
/// # Returns
/// A sub-score starting at 100 with one flag per deduction: sparse rows,
/// then per-column future dates and non-numeric cells.
pub fn score_anomalies(rows: &[Row], schema: &DataSchema, now: NaiveDateTime) -> SubScore {
    let mut deductions = Deductions::default();

    check_sparse_rows(rows, schema, &mut deductions);

    for column in &schema.columns {
        match column.column_type {
            ColumnType::Date => check_future_dates(rows, column, now, &mut deductions),
            ColumnType::Numeric => check_type_mismatches(rows, column, &mut deductions),
            ColumnType::Boolean | ColumnType::Categorical | ColumnType::Text => {}
        }
    }

    let sub = deductions.finish();
    debug!(score = sub.score, flags = sub.flags.len(), "Anomaly score");
    sub
}

fn is_sparse(row: &Row, schema: &DataSchema) -> bool {
    let empty = schema
        .columns
        .iter()
        .filter(|c| is_empty_cell(row.get(&c.name)))
        .count();
    empty * 10 > schema.columns.len() * SPARSE_ROW_TENTHS
}

fn check_sparse_rows(rows: &[Row], schema: &DataSchema, deductions: &mut Deductions) {
    if schema.columns.is_empty() || rows.is_empty() {
        return;
    }
    let sparse = rows.iter().filter(|row| is_sparse(row, schema)).count();
    let pct = percentage(sparse, rows.len());
    if pct > SPARSE_ROWS_PCT_THRESHOLD {
        deductions.deduct(ValidationFlag::critical(
            format!(
                "{sparse} of {} rows ({pct:.1}%) have more than 30% of their fields empty",
                rows.len()
            ),
            pct.min(SPARSE_ROWS_MAX_DEDUCTION),
        ));
    }
}

fn check_future_dates(
    rows: &[Row],
    column: &ColumnSchema,
    now: NaiveDateTime,
    deductions: &mut Deductions,
) {
    let dates: Vec<NaiveDateTime> = rows
        .iter()
        .filter_map(|row| row.get(&column.name))
        .filter_map(parse_date_cell)
        .collect();
    let future = dates.iter().filter(|d| **d > now).count();
    let pct = percentage(future, dates.len());
    if pct > FUTURE_DATES_PCT_THRESHOLD {
        deductions.deduct(
            ValidationFlag::warning(
                format!(
                    "Column '{}' has {future} date(s) in the future ({pct:.1}%)",
                    column.name
                ),
                FUTURE_DATES_DEDUCTION,
            )
            .for_column(&column.name),
        );
    }
}

fn check_type_mismatches(rows: &[Row], column: &ColumnSchema, deductions: &mut Deductions) {
    let non_empty: Vec<_> = rows
        .iter()
        .map(|row| row.get(&column.name))
        .filter(|cell| !is_empty_cell(*cell))
        .flatten()
        .collect();
    let mismatched = non_empty
        .iter()
        .filter(|v| parse_finite(v).is_none())
        .count();
    let pct = percentage(mismatched, non_empty.len());
    if pct > TYPE_MISMATCH_PCT_THRESHOLD {
        deductions.deduct(
            ValidationFlag::warning(
                format!(
                    "Numeric column '{}' has {mismatched} non-numeric value(s) ({pct:.1}%)",
                    column.name
                ),
                pct.min(TYPE_MISMATCH_MAX_DEDUCTION),
            )
            .for_column(&column.name),
        );
    }
}
