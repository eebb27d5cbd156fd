//! Schema discovery for untyped tables.
//!
//! Given rows of key → value pairs with no declared schema, this module infers a
//! semantic type for every column, computes type-specific statistics, and
//! assembles the result into a [`DataSchema`] with a plain-text digest.
//!
//! ## Core Concepts
//!
//! - **Cell**: a JSON scalar. `null`, `""` and a missing key are all "empty" and
//!   are excluded from every ratio.
//! - **Rule chain**: numeric → date → boolean → categorical → text. The first
//!   rule that holds wins, so a `0`/`1` column is numeric, never boolean.
//! - **Statistics**: numeric columns get min/max/mean/median/mode, date columns
//!   an ISO range, categorical columns a representative value.
//!
//! ## Usage
//!
//! ```no_run
//! use datalens::profiling::{ColumnType, discover_schema};
//!
//! # fn example(rows: &[datalens::Row]) {
//! let schema = discover_schema(rows);
//! for column in &schema.columns {
//!     if column.column_type == ColumnType::Numeric {
//!         println!("{} spans {:?}", column.name, column.range());
//!     }
//! }
//! # }
//! ```

pub mod inference;
pub mod schema;
pub mod stats;
pub mod types;
pub mod value;

pub use inference::infer_column_type;
pub use schema::{discover_schema, render_summary};
pub use stats::statistics_for;
pub use types::{
    CategoricalStatistics, ColumnSchema, ColumnStatistics, ColumnType, DataSchema,
    DateStatistics, NumericStatistics,
};
