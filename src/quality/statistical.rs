//! Statistical plausibility: IQR outliers, extreme dispersion, duplicate rows.

use super::types::{Deductions, SubScore, ValidationFlag};
use crate::Row;
use crate::profiling::value::parse_finite;
use crate::profiling::{ColumnSchema, ColumnType, DataSchema};
use std::collections::HashSet;
use tracing::debug;

pub const OUTLIER_PCT_THRESHOLD: f64 = 10.0;
pub const OUTLIER_MAX_DEDUCTION: f64 = 15.0;
pub const IQR_FENCE: f64 = 1.5;
pub const CV_THRESHOLD: f64 = 200.0;
pub const CV_DEDUCTION: f64 = 10.0;
pub const DUPLICATE_CRITICAL_PCT: f64 = 20.0;
pub const DUPLICATE_MAX_DEDUCTION: f64 = 20.0;
pub const DUPLICATE_INFO_PCT: f64 = 5.0;
pub const DUPLICATE_INFO_DEDUCTION: f64 = 5.0;

/// Tukey fences computed from index-based quartiles.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct OutlierFences {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierFences {
    /// `q1 = sorted[floor(n * 0.25)]`, `q3 = sorted[floor(n * 0.75)]`, no
    /// interpolation. `None` for an empty slice.
    pub fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let n = sorted.len() as f64;
        let q1 = *sorted.get((n * 0.25).floor() as usize)?;
        let q3 = *sorted.get((n * 0.75).floor() as usize)?;
        let iqr = q3 - q1;
        Some(Self {
            q1,
            q3,
            lower: q1 - IQR_FENCE * iqr,
            upper: q3 + IQR_FENCE * iqr,
        })
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Coefficient of variation in percent, using the population variance around
/// the supplied mean. Zero when the mean is zero or there are no values.
pub fn coefficient_of_variation(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() || mean == 0.0 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    100.0 * variance.sqrt() / mean.abs()
}

/// Rows whose serialized form already appeared earlier in the table.
pub fn duplicate_row_count(rows: &[Row]) -> usize {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.iter()
        .filter_map(|row| serde_json::to_string(row).ok())
        .filter(|key| !seen.insert(key.clone()))
        .count()
}

/// Scores the distribution of numeric columns and the share of duplicate rows.
///
/// # Arguments
/// * `rows` - the table being scored
/// * `schema` - the schema discovered from `rows`
///
/// # Returns
/// A sub-score starting at 100 with outlier and variation flags per numeric
/// column, followed by a duplicate-row flag when there are any.
pub fn score_statistics(rows: &[Row], schema: &DataSchema) -> SubScore {
    let mut deductions = Deductions::default();

    for column in schema.columns_of(ColumnType::Numeric) {
        let values: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.get(&column.name))
            .filter_map(parse_finite)
            .collect();
        if values.is_empty() {
            continue;
        }
        check_outliers(column, &values, &mut deductions);
        check_dispersion(column, &values, &mut deductions);
    }

    check_duplicates(rows, &mut deductions);

    let sub = deductions.finish();
    debug!(score = sub.score, flags = sub.flags.len(), "Statistical score");
    sub
}

fn check_outliers(column: &ColumnSchema, values: &[f64], deductions: &mut Deductions) {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let Some(fences) = OutlierFences::from_sorted(&sorted) else {
        return;
    };

    let outliers = sorted.iter().filter(|v| fences.is_outlier(**v)).count();
    let pct = outliers as f64 / sorted.len() as f64 * 100.0;
    if pct > OUTLIER_PCT_THRESHOLD {
        deductions.deduct(
            ValidationFlag::warning(
                format!(
                    "Column '{}' has {outliers} outlier(s) ({pct:.1}%) outside [{}, {}]",
                    column.name, fences.lower, fences.upper
                ),
                (pct / 2.0).min(OUTLIER_MAX_DEDUCTION),
            )
            .for_column(&column.name),
        );
    }
}

fn check_dispersion(column: &ColumnSchema, values: &[f64], deductions: &mut Deductions) {
    let Some(stats) = column.numeric_statistics() else {
        return;
    };
    let cv = coefficient_of_variation(values, stats.mean);
    if cv > CV_THRESHOLD {
        deductions.deduct(
            ValidationFlag::warning(
                format!(
                    "Column '{}' is extremely dispersed (coefficient of variation {cv:.0}%)",
                    column.name
                ),
                CV_DEDUCTION,
            )
            .for_column(&column.name),
        );
    }
}

fn check_duplicates(rows: &[Row], deductions: &mut Deductions) {
    if rows.is_empty() {
        return;
    }
    let duplicates = duplicate_row_count(rows);
    let pct = duplicates as f64 / rows.len() as f64 * 100.0;

    if pct > DUPLICATE_CRITICAL_PCT {
        deductions.deduct(ValidationFlag::critical(
            format!("{duplicates} of {} rows are exact duplicates ({pct:.1}%)", rows.len()),
            pct.min(DUPLICATE_MAX_DEDUCTION),
        ));
    } else if pct > DUPLICATE_INFO_PCT {
        deductions.deduct(ValidationFlag::info(
            format!("{duplicates} of {} rows are exact duplicates ({pct:.1}%)", rows.len()),
            DUPLICATE_INFO_DEDUCTION,
        ));
    }
}
