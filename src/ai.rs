//! Language model access.
//!
//! Everything that talks to an LLM goes through [`SemanticBackend`], so the
//! semantic validator and the dataset assistant can be driven by a scripted
//! backend in tests and by [`OpenAiBackend`] in production.

pub mod client;

pub use client::{OpenAiBackend, SemanticBackend};
