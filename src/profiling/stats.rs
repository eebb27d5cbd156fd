//! Per-type statistics.
//!
//! Downstream narrative text quotes these numbers, so the definitions are fixed:
//! - the median is the element at index `n / 2` of the sorted values, with no
//!   averaging for even counts;
//! - the numeric mode is the most frequent value, ties going to the smallest;
//! - the categorical "mode" is the first distinct value in row order.

use super::types::{
    CategoricalStatistics, ColumnStatistics, ColumnType, DateStatistics, NumericStatistics,
};
use super::value::{format_float, is_empty_cell, parse_date_cell, parse_finite, round_half_up};
use serde_json::Value;

/// Finite values of the column in row order.
pub fn finite_values(cells: &[Option<&Value>]) -> Vec<f64> {
    cells
        .iter()
        .copied()
        .flatten()
        .filter_map(parse_finite)
        .collect()
}

pub fn numeric_statistics(cells: &[Option<&Value>]) -> Option<NumericStatistics> {
    let values = finite_values(cells);
    if values.is_empty() {
        return None;
    }

    let mean = round_half_up(values.iter().sum::<f64>() / values.len() as f64, 2);

    let mut sorted = values;
    sorted.sort_by(f64::total_cmp);
    let min = *sorted.first()?;
    let max = *sorted.last()?;
    let median = *sorted.get(sorted.len() / 2)?;
    let mode = most_frequent(&sorted)?;

    Some(NumericStatistics {
        min,
        max,
        mean,
        median,
        mode,
        range: format!("{}–{}", format_float(min), format_float(max)),
    })
}

/// Most frequent value of an ascending slice; the smallest value wins ties.
fn most_frequent(sorted: &[f64]) -> Option<f64> {
    let mut best: Option<(f64, usize)> = None;
    let mut run_start = 0;

    for (idx, value) in sorted.iter().enumerate() {
        let next_differs = sorted.get(idx + 1).is_none_or(|next| next != value);
        if next_differs {
            let run_len = idx + 1 - run_start;
            if best.is_none_or(|(_, count)| run_len > count) {
                best = Some((*value, run_len));
            }
            run_start = idx + 1;
        }
    }

    best.map(|(value, _)| value)
}

pub fn date_statistics(cells: &[Option<&Value>]) -> Option<DateStatistics> {
    let mut dates: Vec<_> = cells
        .iter()
        .copied()
        .flatten()
        .filter_map(parse_date_cell)
        .collect();
    dates.sort_unstable();

    let first = dates.first()?;
    let last = dates.last()?;
    Some(DateStatistics {
        range: format!("{}–{}", first.format("%Y-%m-%d"), last.format("%Y-%m-%d")),
    })
}

pub fn categorical_statistics(cells: &[Option<&Value>]) -> Option<CategoricalStatistics> {
    cells
        .iter()
        .copied()
        .find(|cell| !is_empty_cell(*cell))
        .flatten()
        .map(|first| CategoricalStatistics {
            mode: first.clone(),
        })
}

/// Statistics for an already-typed column. Boolean and text columns carry none.
pub fn statistics_for(column_type: ColumnType, cells: &[Option<&Value>]) -> Option<ColumnStatistics> {
    match column_type {
        ColumnType::Numeric => numeric_statistics(cells).map(ColumnStatistics::Numeric),
        ColumnType::Date => date_statistics(cells).map(ColumnStatistics::Date),
        ColumnType::Categorical => categorical_statistics(cells).map(ColumnStatistics::Categorical),
        ColumnType::Boolean | ColumnType::Text => None,
    }
}
