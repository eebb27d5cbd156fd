//! # Datalens - Schema Discovery & Data Quality Scoring
//!
//! Datalens takes an arbitrary table of untyped records (rows of key → value
//! pairs with no declared schema), infers a semantic type and descriptive
//! statistics for every column, and computes a reproducible 0-100 data-quality
//! score with actionable flags.
//!
//! ## Quick Start
//!
//! ```no_run
//! use datalens::{profiling, quality};
//!
//! # fn example() -> anyhow::Result<()> {
//! let rows: Vec<datalens::Row> = serde_json::from_str(
//!     r#"[{"region": "north", "sales": "120"}, {"region": "south", "sales": "95"}]"#,
//! )?;
//!
//! let schema = profiling::discover_schema(&rows);
//! println!("{}", schema.summary);
//!
//! let score = quality::validate_table(&rows, &schema);
//! println!("overall {} ({})", score.overall, score.risk_level);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Modules
//!
//! - [`table`]: Loading rows from JSON files
//! - [`profiling`]: Type inference, per-type statistics and schema assembly
//! - [`quality`]: Structural, statistical and anomaly scorers plus the aggregator
//! - [`semantic`]: Message-passing boundary to an external LLM reviewer
//! - [`assistant`]: Compact dataset digests for free-form questions
//! - [`ai`]: Language model backend trait and the OpenAI client
//! - [`config`]: Persisted settings for the AI collaborators
//! - [`error`]: Error types and handling utilities
//! - [`logging`]: Tracing subscriber setup
//!
//! ## Pipeline
//!
//! ```text
//! rows ──> discover_schema ──> DataSchema ──┬──> score_structure ──┐
//!                                           ├──> score_statistics ─┼──> ValidationScore
//!                                           └──> score_anomalies ──┘          │
//!                                                                             v
//!                                                          SemanticValidator (optional, async)
//! ```
//!
//! Everything up to `ValidationScore` is synchronous, pure and total: it never
//! panics or errors on a rectangular table, and identical input always yields
//! identical output. Only the semantic step touches the network, and its
//! failures are folded into a fallback opinion.

#![warn(clippy::all, rust_2018_idioms)]

pub mod ai;
pub mod assistant;
pub mod config;
pub mod error;
pub mod logging;
pub mod profiling;
pub mod quality;
pub mod semantic;
pub mod table;

/// A single record: column name to untyped scalar.
///
/// Key order is preserved, so the first row's keys define the column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

pub use profiling::{ColumnSchema, ColumnStatistics, ColumnType, DataSchema, discover_schema};
pub use quality::{RiskLevel, Severity, ValidationFlag, ValidationScore, validate_table};
