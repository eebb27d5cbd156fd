use super::opinion::{SemanticOpinion, parse_opinion};
use super::prompt::{SYSTEM_PROMPT, build_validation_prompt};
use super::request::SemanticRequest;
use crate::ai::SemanticBackend;
use crate::config::AIConfig;
use crate::error::{DatalensError, Result};
use crate::profiling::types::NO_DATA_SUMMARY;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Asks a backend for a second opinion under a time budget.
#[derive(Clone)]
pub struct SemanticValidator {
    backend: Arc<dyn SemanticBackend>,
    timeout: Duration,
}

impl SemanticValidator {
    pub fn new(backend: Arc<dyn SemanticBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Uses the effective timeout from `config`.
    pub fn from_config(backend: Arc<dyn SemanticBackend>, config: &AIConfig) -> Self {
        Self::new(backend, config.timeout())
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Never fails: any problem yields [`SemanticOpinion::fallback`].
    pub async fn validate(&self, request: &SemanticRequest) -> SemanticOpinion {
        self.validate_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`validate`](Self::validate), but gives up as soon as `cancel` fires.
    pub async fn validate_with_cancel(
        &self,
        request: &SemanticRequest,
        cancel: &CancellationToken,
    ) -> SemanticOpinion {
        match self.try_validate(request, cancel).await {
            Ok(opinion) => {
                info!(
                    quality_score = opinion.quality_score,
                    red_flags = opinion.red_flags.len(),
                    "Semantic validation complete"
                );
                opinion
            }
            Err(err) => {
                warn!(error = %err, "Semantic validation unavailable, using fallback");
                SemanticOpinion::fallback(&request.scores, &err.to_string())
            }
        }
    }

    /// The fallible core, for callers that want to see why a review failed.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty schema, a timeout, cancellation, a
    /// backend failure, or a reply with no usable JSON.
    pub async fn try_validate(
        &self,
        request: &SemanticRequest,
        cancel: &CancellationToken,
    ) -> Result<SemanticOpinion> {
        if request.schema.is_empty() {
            return Err(DatalensError::InvalidInput(NO_DATA_SUMMARY.to_owned()));
        }

        let prompt = build_validation_prompt(request)?;
        let call = tokio::time::timeout(self.timeout, self.backend.complete(SYSTEM_PROMPT, &prompt));

        let reply = tokio::select! {
            () = cancel.cancelled() => return Err(DatalensError::Cancelled),
            result = call => result.map_err(|_elapsed| DatalensError::Timeout(self.timeout.as_secs()))??,
        };

        parse_opinion(&reply, &request.scores)
    }
}
