//! Compact dataset digests.
//!
//! A digest replaces the full table in a question prompt: column-level
//! statistics computed over every row, plus a handful of sample rows.

use crate::Row;
use crate::profiling::value::{cell_text, is_empty_cell, parse_finite, round_half_up};
use crate::profiling::{ColumnSchema, ColumnType, DataSchema};
use serde::Serialize;
use std::collections::HashMap;

pub const TOP_VALUE_LIMIT: usize = 5;

#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct NumericDigest {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub sum: f64,
}

#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct TopValue {
    pub value: String,
    pub count: usize,
    /// Share of non-empty cells, e.g. `"42.5%"`.
    pub percentage: String,
}

#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct CategoricalDigest {
    pub count: usize,
    pub unique_count: usize,
    pub top_values: Vec<TopValue>,
}

#[derive(Clone, Serialize, PartialEq, Debug)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DigestStats {
    Numeric(NumericDigest),
    Categorical(CategoricalDigest),
}

#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct ColumnDigest {
    pub name: String,
    pub column_type: ColumnType,
    pub stats: Option<DigestStats>,
}

#[derive(Clone, Serialize, PartialEq, Debug)]
pub struct DatasetDigest {
    pub name: String,
    pub row_count: usize,
    pub columns: Vec<ColumnDigest>,
    pub sample: Vec<Row>,
}

impl DatasetDigest {
    pub fn build(name: &str, rows: &[Row], schema: &DataSchema) -> Self {
        Self {
            name: name.to_owned(),
            row_count: rows.len(),
            columns: schema
                .columns
                .iter()
                .map(|column| ColumnDigest {
                    name: column.name.clone(),
                    column_type: column.column_type,
                    stats: column_stats(column, rows),
                })
                .collect(),
            sample: digest_sample(rows),
        }
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

fn column_stats(column: &ColumnSchema, rows: &[Row]) -> Option<DigestStats> {
    let cells = rows
        .iter()
        .map(|row| row.get(&column.name))
        .filter(|cell| !is_empty_cell(*cell))
        .flatten();

    match column.column_type {
        ColumnType::Numeric => numeric_digest(cells.filter_map(parse_finite).collect()),
        ColumnType::Categorical | ColumnType::Text | ColumnType::Boolean => {
            categorical_digest(cells.map(|v| cell_text(v).into_owned()).collect())
        }
        ColumnType::Date => None,
    }
}

fn numeric_digest(values: Vec<f64>) -> Option<DigestStats> {
    let first = *values.first()?;
    let (min, max) = values
        .iter()
        .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let sum: f64 = values.iter().sum();

    Some(DigestStats::Numeric(NumericDigest {
        count: values.len(),
        min: round_half_up(min, 2),
        max: round_half_up(max, 2),
        avg: round_half_up(sum / values.len() as f64, 2),
        sum: round_half_up(sum, 2),
    }))
}

/// Most frequent values first; ties keep first-seen order.
fn categorical_digest(values: Vec<String>) -> Option<DigestStats> {
    if values.is_empty() {
        return None;
    }

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in &values {
        let count = counts.entry(value.as_str()).or_insert(0);
        if *count == 0 {
            order.push(value.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<(&str, usize)> = order
        .iter()
        .map(|v| (*v, counts.get(v).copied().unwrap_or_default()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let total = values.len() as f64;
    Some(DigestStats::Categorical(CategoricalDigest {
        count: values.len(),
        unique_count: order.len(),
        top_values: ranked
            .into_iter()
            .take(TOP_VALUE_LIMIT)
            .map(|(value, count)| TopValue {
                value: value.to_owned(),
                count,
                percentage: format!("{:.1}%", count as f64 / total * 100.0),
            })
            .collect(),
    }))
}

/// ≤10 rows: all; ≤100: first 10; ≤500: first 5 and last 5; beyond that the
/// first 5, two from the middle and the last 3.
pub fn digest_sample(rows: &[Row]) -> Vec<Row> {
    let total = rows.len();
    let head_tail = |head: usize, tail: usize| -> Vec<Row> {
        rows.iter()
            .take(head)
            .chain(rows.iter().skip(total.saturating_sub(tail)))
            .cloned()
            .collect()
    };

    match total {
        0..=10 => rows.to_vec(),
        11..=100 => rows.iter().take(10).cloned().collect(),
        101..=500 => head_tail(5, 5),
        _ => rows
            .iter()
            .take(5)
            .chain(rows.iter().skip(total / 2).take(2))
            .chain(rows.iter().skip(total - 3))
            .cloned()
            .collect(),
    }
}
