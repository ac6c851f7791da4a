//! Natural-language regimen extraction
//!
//! Free text goes to an OpenAI-compatible model constrained by a JSON schema;
//! the model transcribes the stated medications and nothing else. All dosing
//! arithmetic stays in the conversion engine.

pub mod client;
pub mod schema;

pub use client::{LlmClient, LlmError, LlmResult};
