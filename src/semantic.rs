//! Boundary to the external semantic validator.
//!
//! The deterministic score is final; an LLM is only asked for a qualitative
//! second opinion. The exchange is modelled as plain messages:
//!
//! - [`SemanticRequest`]: schema, scores and a size-adaptive row sample
//! - [`SemanticOpinion`]: the reviewer's verdict, or a fallback built locally
//!
//! [`SemanticValidator`] owns the timeout, cancellation and fallback policy.
//! Nothing that goes wrong on the far side of the boundary (unreachable
//! service, slow reply, prose instead of JSON) surfaces as an error.

pub mod opinion;
pub mod prompt;
pub mod request;
pub mod validator;

pub use crate::ai::{OpenAiBackend, SemanticBackend};
pub use opinion::{SemanticOpinion, extract_json_block, parse_opinion};
pub use request::{SemanticRequest, sample_rows};
pub use validator::SemanticValidator;
