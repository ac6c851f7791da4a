//! Data models
//!
//! Rust structs representing regimens and conversion requests/results.

mod medication;
mod regimen;

pub use medication::Medication;
pub use regimen::{ConversionRequest, ConversionResult, Regimen};
