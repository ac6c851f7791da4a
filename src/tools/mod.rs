//! Calculator tools module
//!
//! MCP tool implementations for the opioid equianalgesic calculator.

pub mod convert;
pub mod parse;
pub mod status;
