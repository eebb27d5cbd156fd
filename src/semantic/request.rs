use crate::Row;
use crate::profiling::DataSchema;
use crate::quality::ValidationScore;
use serde::{Deserialize, Serialize};

/// Tables up to this size are sent whole.
pub const FULL_SAMPLE_MAX_ROWS: usize = 200;

/// Rows taken from each end of a larger table, by table size.
fn edge_rows(total: usize) -> usize {
    match total {
        0..=1_000 => 100,
        1_001..=5_000 => 75,
        _ => 50,
    }
}

/// Size-adaptive sample: every row for small tables, otherwise a head and a
/// tail slice that shrink as the table grows (200, 150, then 100 rows).
pub fn sample_rows(rows: &[Row]) -> Vec<Row> {
    let total = rows.len();
    if total <= FULL_SAMPLE_MAX_ROWS {
        return rows.to_vec();
    }

    let edge = edge_rows(total);
    rows.iter()
        .take(edge)
        .chain(rows.iter().skip(total - edge))
        .cloned()
        .collect()
}

/// Everything the reviewer sees: schema, deterministic scores and a sample.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SemanticRequest {
    pub schema: DataSchema,
    pub scores: ValidationScore,
    pub sample: Vec<Row>,
}

impl SemanticRequest {
    /// Bundles a request, sampling `rows` with [`sample_rows`].
    pub fn new(schema: DataSchema, scores: ValidationScore, rows: &[Row]) -> Self {
        Self {
            schema,
            scores,
            sample: sample_rows(rows),
        }
    }
}
