//! Data-quality scoring.
//!
//! Three independent scorers each start at 100 and deduct points for what
//! they find, recording one [`ValidationFlag`] per deduction:
//!
//! - [`structural`]: missing values, fully empty columns, near-constant numerics
//! - [`statistical`]: IQR outliers, extreme dispersion, duplicate rows
//! - [`anomaly`]: sparse rows, future dates, non-numeric cells in numeric columns
//!
//! [`aggregate`] weighs them 35/35/30 into an overall score and a risk level.
//! Scoring is total: any rectangular table and its schema produce a score.

pub mod aggregate;
pub mod anomaly;
pub mod statistical;
pub mod structural;
pub mod types;

pub use aggregate::{combine, overall_score, risk_level};
pub use anomaly::score_anomalies;
pub use statistical::score_statistics;
pub use structural::score_structure;
pub use types::{RiskLevel, Severity, SubScore, ValidationFlag, ValidationScore};

use crate::Row;
use crate::profiling::DataSchema;
use crate::profiling::types::NO_DATA_SUMMARY;
use chrono::{NaiveDateTime, Utc};
use tracing::info;

impl ValidationScore {
    /// Score reported for a table with no columns.
    pub fn no_data() -> Self {
        Self {
            structural: 0,
            statistical: 0,
            anomaly: 0,
            overall: 0,
            risk_level: RiskLevel::High,
            flags: vec![ValidationFlag::critical(NO_DATA_SUMMARY, 100.0)],
        }
    }
}

/// Scores a table against its discovered schema, treating the current UTC
/// time as "now" for future-date detection.
pub fn validate_table(rows: &[Row], schema: &DataSchema) -> ValidationScore {
    validate_table_at(rows, schema, Utc::now().naive_utc())
}

/// Deterministic variant of [`validate_table`] with an explicit evaluation time.
pub fn validate_table_at(rows: &[Row], schema: &DataSchema, now: NaiveDateTime) -> ValidationScore {
    if schema.is_empty() {
        info!("Empty schema, reporting no data");
        return ValidationScore::no_data();
    }

    let score = combine(
        score_structure(rows, schema),
        score_statistics(rows, schema),
        score_anomalies(rows, schema, now),
    );

    info!(
        overall = score.overall,
        structural = score.structural,
        statistical = score.statistical,
        anomaly = score.anomaly,
        risk = %score.risk_level,
        flags = score.flags.len(),
        "Table validated"
    );
    score
}
