use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Semantic type assigned to a column by the inference rule chain.
#[derive(Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Date,
    Boolean,
    Categorical,
    Text,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Categorical => "categorical",
            Self::Text => "text",
        }
    }
}

/// Type-dependent statistics. Serialized untagged so the JSON stays flat,
/// e.g. `{"min": 1, "max": 9, ...}` for numeric columns.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(untagged)]
pub enum ColumnStatistics {
    Numeric(NumericStatistics),
    Date(DateStatistics),
    Categorical(CategoricalStatistics),
}

impl ColumnStatistics {
    pub fn range(&self) -> Option<&str> {
        match self {
            Self::Numeric(s) => Some(&s.range),
            Self::Date(s) => Some(&s.range),
            Self::Categorical(_) => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct NumericStatistics {
    pub min: f64,
    pub max: f64,
    /// Rounded to 2 decimals.
    pub mean: f64,
    /// Element at index `n / 2` of the sorted values (no averaging).
    pub median: f64,
    pub mode: f64,
    /// `"{min}–{max}"`
    pub range: String,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct DateStatistics {
    /// `"yyyy-mm-dd–yyyy-mm-dd"`
    pub range: String,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
pub struct CategoricalStatistics {
    /// First distinct value in row order.
    pub mode: Value,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// 0-100, one decimal.
    pub null_percentage: f64,
    /// Distinct non-empty values.
    pub unique_count: usize,
    /// Up to five distinct values in row order.
    pub sample_values: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ColumnStatistics>,
}

impl ColumnSchema {
    pub fn range(&self) -> Option<&str> {
        self.statistics.as_ref().and_then(ColumnStatistics::range)
    }

    pub fn numeric_statistics(&self) -> Option<&NumericStatistics> {
        match &self.statistics {
            Some(ColumnStatistics::Numeric(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_fully_empty(&self) -> bool {
        self.unique_count == 0
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DataSchema {
    pub total_rows: usize,
    pub total_columns: usize,
    pub columns: Vec<ColumnSchema>,
    pub summary: String,
}

pub const NO_DATA_SUMMARY: &str = "No data provided";

impl DataSchema {
    /// Schema of a table with no rows.
    pub fn empty() -> Self {
        Self {
            total_rows: 0,
            total_columns: 0,
            columns: Vec::new(),
            summary: NO_DATA_SUMMARY.to_owned(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_rows == 0 || self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn columns_of(&self, column_type: ColumnType) -> impl Iterator<Item = &ColumnSchema> {
        self.columns
            .iter()
            .filter(move |c| c.column_type == column_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_schema_json_shape() {
        let column = ColumnSchema {
            name: "price".to_owned(),
            column_type: ColumnType::Numeric,
            null_percentage: 12.5,
            unique_count: 3,
            sample_values: vec![json!("1"), json!("2"), json!("9")],
            statistics: Some(ColumnStatistics::Numeric(NumericStatistics {
                min: 1.0,
                max: 9.0,
                mean: 4.0,
                median: 2.0,
                mode: 1.0,
                range: "1–9".to_owned(),
            })),
        };

        let value = serde_json::to_value(&column).expect("serializes");
        assert_eq!(value["type"], json!("numeric"));
        assert_eq!(value["nullPercentage"], json!(12.5));
        assert_eq!(value["uniqueCount"], json!(3));
        assert_eq!(value["statistics"]["range"], json!("1–9"));
        assert!(value["statistics"].get("Numeric").is_none());
    }

    #[test]
    fn test_untagged_statistics_round_trip_to_right_variant() {
        let date: ColumnStatistics =
            serde_json::from_value(json!({"range": "2024-01-01–2024-02-01"})).expect("date");
        assert!(matches!(date, ColumnStatistics::Date(_)));

        let categorical: ColumnStatistics =
            serde_json::from_value(json!({"mode": "north"})).expect("categorical");
        assert!(matches!(categorical, ColumnStatistics::Categorical(_)));
    }

    #[test]
    fn test_empty_schema() {
        let schema = DataSchema::empty();
        assert!(schema.is_empty());
        assert_eq!(schema.summary, "No data provided");
        assert!(schema.column("anything").is_none());
    }
}
