//! Column type inference.
//!
//! Types are decided by an ordered rule chain evaluated over the non-empty
//! cells of a column. Each rule either claims the column or passes it on;
//! nothing here fails, ambiguous columns just fall through to `text`.

use super::types::ColumnType;
use super::value::{
    is_boolean_literal, is_empty_cell, is_numeric_cell, parse_date_cell, value_key,
};
use serde_json::Value;
use std::collections::HashSet;

/// Share of non-empty cells (in percent) a parser must accept for the column
/// to take that type.
pub const TYPE_CONFIDENCE_PCT: usize = 95;

/// Categorical columns have fewer than this share (in percent) of distinct values...
pub const CATEGORICAL_MAX_UNIQUE_PCT: usize = 50;

/// ...and at most this many distinct values.
pub const CATEGORICAL_MAX_UNIQUE: usize = 20;

/// Evaluation order. Earlier rules win, so `0`/`1` columns are numeric even
/// though they also satisfy the boolean rule.
pub const RULE_CHAIN: [ColumnType; 4] = [
    ColumnType::Numeric,
    ColumnType::Date,
    ColumnType::Boolean,
    ColumnType::Categorical,
];

struct ColumnEvidence<'a> {
    non_empty: Vec<&'a Value>,
    unique_count: usize,
}

impl<'a> ColumnEvidence<'a> {
    fn collect(cells: &[Option<&'a Value>]) -> Self {
        let non_empty: Vec<&Value> = cells
            .iter()
            .copied()
            .filter(|cell| !is_empty_cell(*cell))
            .flatten()
            .collect();
        let unique_count = non_empty
            .iter()
            .map(|v| value_key(v))
            .collect::<HashSet<_>>()
            .len();
        Self {
            non_empty,
            unique_count,
        }
    }

    fn share_at_least(&self, accepts: impl Fn(&Value) -> bool, pct: usize) -> bool {
        let matching = self.non_empty.iter().filter(|v| accepts(v)).count();
        matching * 100 >= self.non_empty.len() * pct
    }

    fn satisfies(&self, rule: ColumnType) -> bool {
        match rule {
            ColumnType::Numeric => self.share_at_least(is_numeric_cell, TYPE_CONFIDENCE_PCT),
            ColumnType::Date => {
                self.share_at_least(|v| parse_date_cell(v).is_some(), TYPE_CONFIDENCE_PCT)
            }
            ColumnType::Boolean => self.share_at_least(is_boolean_literal, TYPE_CONFIDENCE_PCT),
            ColumnType::Categorical => {
                self.unique_count * 100 < self.non_empty.len() * CATEGORICAL_MAX_UNIQUE_PCT
                    && self.unique_count <= CATEGORICAL_MAX_UNIQUE
            }
            ColumnType::Text => true,
        }
    }
}

/// Infers the semantic type of a column from all of its cells, empties included.
pub fn infer_column_type(cells: &[Option<&Value>]) -> ColumnType {
    let evidence = ColumnEvidence::collect(cells);
    if evidence.non_empty.is_empty() {
        return ColumnType::Text;
    }

    RULE_CHAIN
        .into_iter()
        .find(|rule| evidence.satisfies(*rule))
        .unwrap_or(ColumnType::Text)
}
