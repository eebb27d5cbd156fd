//! Free-form questions about a dataset.
//!
//! Instead of shipping the whole table to the model, the assistant sends a
//! [`DatasetDigest`]: exact column statistics over every row plus a few sample
//! rows. Answers come back as markdown, with a hint when the question asks for
//! a chart.

pub mod digest;
pub mod prompt;

pub use digest::{DatasetDigest, DigestStats};
pub use prompt::{build_question_prompt, wants_visualization};

use crate::Row;
use crate::ai::SemanticBackend;
use crate::config::AIConfig;
use crate::error::{DatalensError, Result};
use crate::profiling::discover_schema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub const NO_DATA_REPLY: &str =
    "⚠️ **No Data Available**\n\nPlease upload a dataset first to analyze.";

/// Markdown answer plus a hint for the caller to render a chart.
#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub response: String,
    pub suggests_visualization: bool,
}

/// Answers questions about a table through a [`SemanticBackend`].
pub struct DataAssistant {
    backend: Arc<dyn SemanticBackend>,
    timeout: Duration,
}

impl DataAssistant {
    pub fn new(backend: Arc<dyn SemanticBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Uses the effective timeout from `config`.
    pub fn from_config(backend: Arc<dyn SemanticBackend>, config: &AIConfig) -> Self {
        Self::new(backend, config.timeout())
    }

    /// Answers `query` about `rows`.
    ///
    /// # Errors
    ///
    /// Empty queries are rejected. Backend failures and timeouts propagate;
    /// unlike semantic validation there is no meaningful local fallback.
    pub async fn answer(&self, query: &str, name: &str, rows: &[Row]) -> Result<AssistantReply> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DatalensError::InvalidInput("Missing query".to_owned()));
        }
        if rows.is_empty() {
            return Ok(AssistantReply {
                response: NO_DATA_REPLY.to_owned(),
                suggests_visualization: false,
            });
        }

        let schema = discover_schema(rows);
        let digest = DatasetDigest::build(name, rows, &schema);
        info!(
            rows = digest.row_count,
            columns = digest.columns.len(),
            sample = digest.sample.len(),
            "Dataset digest created"
        );

        let prompt = build_question_prompt(query, &digest)?;
        let response = tokio::time::timeout(
            self.timeout,
            self.backend.complete(prompt::SYSTEM_PROMPT, &prompt),
        )
        .await
        .map_err(|_elapsed| DatalensError::Timeout(self.timeout.as_secs()))??;

        info!(chars = response.len(), "Assistant response received");
        Ok(AssistantReply {
            response,
            suggests_visualization: wants_visualization(query),
        })
    }
}
