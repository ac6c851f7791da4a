//! Conversion engine
//!
//! The computational core: unit-class normalization, frequency multipliers,
//! the indexed conversion table, and the OME arithmetic. Everything here is
//! pure and stateless apart from the read-only table loaded at startup.

pub mod engine;
pub mod frequency;
pub mod table;
pub mod units;

pub use engine::{convert_from_ome, daily_dose, regimen_ome, total_ome, MedicationOme, RegimenOme};
pub use frequency::daily_multiplier;
pub use table::{ConversionRecord, ConversionTable, TableError, TableResult};
pub use units::{normalize_unit, UnitClass};
