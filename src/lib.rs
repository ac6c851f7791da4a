//! Opioid Equianalgesic Calculator (omecalc) Library
//!
//! Core functionality for converting opioid regimens to oral morphine
//! equivalents and equianalgesic target doses.

pub mod build_info;
pub mod conversion;
pub mod llm;
pub mod mcp;
pub mod models;
pub mod tools;
