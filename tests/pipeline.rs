//! End-to-end runs of discovery and scoring on realistic tables.

mod common;

use common::{sales, table};
use datalens::quality::validate_table_at;
use datalens::{ColumnType, RiskLevel, Severity, discover_schema};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};

fn evaluation_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

#[test]
fn test_tidy_table_end_to_end() {
    let rows = sales(120);
    let schema = discover_schema(&rows);

    let types: Vec<(&str, ColumnType)> = schema
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.column_type))
        .collect();
    assert_eq!(
        types,
        [
            ("order_id", ColumnType::Text),
            ("region", ColumnType::Categorical),
            ("units", ColumnType::Numeric),
            ("unit_price", ColumnType::Numeric),
            ("ordered_on", ColumnType::Date),
            ("gift", ColumnType::Boolean),
        ]
    );

    let score = validate_table_at(&rows, &schema, evaluation_time());
    assert_eq!(score.overall, 100, "unexpected flags: {:?}", score.flags);
    assert_eq!(score.risk_level, RiskLevel::Low);
}

#[test]
fn test_messy_export_end_to_end() {
    let mut values: Vec<Value> = (0..30)
        .map(|i| {
            json!({
                "customer": format!("C{i:03}"),
                "email": if i % 4 == 0 { json!(format!("c{i}@example.com")) } else { json!("") },
                "age": if i == 7 { json!(999) } else { json!(20 + i % 40) },
                "signup": if i < 4 { json!("2031-01-01") } else { json!(format!("2022-03-{:02}", 1 + i % 28)) },
                "notes": null,
            })
        })
        .collect();
    // A re-imported block of identical rows.
    let repeated = values.first().cloned().expect("first row");
    values.extend(std::iter::repeat_n(repeated, 10));
    let rows = table(values);

    let schema = discover_schema(&rows);
    let score = validate_table_at(&rows, &schema, evaluation_time());

    let critical_columns: Vec<Option<&str>> = score
        .flags_with(Severity::Critical)
        .map(|f| f.column.as_deref())
        .collect();
    // email is mostly empty, notes is entirely empty, duplicates are table-wide.
    assert!(critical_columns.contains(&Some("email")));
    assert!(critical_columns.contains(&Some("notes")));
    assert!(critical_columns.contains(&None));
    assert!(
        score
            .flags
            .iter()
            .any(|f| f.column.as_deref() == Some("signup") && f.severity == Severity::Warning)
    );
    assert!(score.structural < 70);
    assert!(score.statistical <= 80);
    assert_ne!(score.risk_level, RiskLevel::Low);
}

#[test]
fn test_runs_are_byte_identical() {
    let rows = sales(250);
    let first = (
        serde_json::to_string(&discover_schema(&rows)).expect("schema json"),
        serde_json::to_string(&validate_table_at(&rows, &discover_schema(&rows), evaluation_time()))
            .expect("score json"),
    );
    let second = (
        serde_json::to_string(&discover_schema(&rows)).expect("schema json"),
        serde_json::to_string(&validate_table_at(&rows, &discover_schema(&rows), evaluation_time()))
            .expect("score json"),
    );
    assert_eq!(first, second);
}

#[test]
fn test_empty_table_end_to_end() {
    let schema = discover_schema(&[]);
    assert_eq!(
        serde_json::to_value(&schema).expect("json"),
        json!({"totalRows": 0, "totalColumns": 0, "columns": [], "summary": "No data provided"})
    );

    let score = validate_table_at(&[], &schema, evaluation_time());
    assert_eq!(score.overall, 0);
    assert_eq!(score.risk_level, RiskLevel::High);
}

#[test]
fn test_schema_json_shape() {
    let rows = table(vec![
        json!({"price": "12.50", "label": "a"}),
        json!({"price": "7", "label": "a"}),
        json!({"price": null, "label": "b"}),
    ]);
    let schema = discover_schema(&rows);
    let price = serde_json::to_value(schema.column("price").expect("price")).expect("json");

    assert_eq!(price.get("type"), Some(&json!("numeric")));
    assert_eq!(price.get("nullPercentage"), Some(&json!(33.3)));
    assert_eq!(price.get("uniqueCount"), Some(&json!(2)));
    assert_eq!(
        price.pointer("/statistics/range"),
        Some(&json!("7–12.5"))
    );
}
