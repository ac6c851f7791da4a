//! Conversion table loading and lookup
//!
//! The reference dataset maps (drug, route, unit class) to an OME conversion
//! factor. It is loaded and validated once at startup; a missing or malformed
//! table is fatal because no conversion can be served without it. Lookups go
//! through an index built at load time rather than scanning the record list.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::units::UnitClass;

/// Table loading/validation errors
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read conversion table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed conversion table: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Conversion table contains no records")]
    Empty,

    #[error("Invalid record for {drug}/{route}: {reason}")]
    InvalidRecord {
        drug: String,
        route: String,
        reason: String,
    },
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// One reference record: a drug/route/unit combination and its factor to OME
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Drug name, lowercase (e.g., "morphine")
    pub drug: String,
    /// Route, lowercase (e.g., "po", "iv", "transdermal")
    pub route: String,
    /// Normalized unit class: "mg/day", "mcg/day", "mcg/hr", or "mg/hr"
    pub dose_unit: String,
    /// Multiplier from a daily dose in `dose_unit` to mg/day OME
    pub to_ome: f64,
}

/// Wire format of the dataset file
#[derive(Debug, Deserialize)]
struct ConversionData {
    records: Vec<ConversionRecord>,
}

/// Composite lookup key; drug and route are stored lowercased and trimmed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TableKey {
    drug: String,
    route: String,
    unit: UnitClass,
}

impl TableKey {
    fn new(drug: &str, route: &str, unit: UnitClass) -> Self {
        Self {
            drug: drug.trim().to_lowercase(),
            route: route.trim().to_lowercase(),
            unit,
        }
    }
}

/// The immutable conversion table: raw records plus a lookup index.
///
/// Read-only after load; safe for unsynchronized concurrent reads.
#[derive(Debug)]
pub struct ConversionTable {
    records: Vec<ConversionRecord>,
    index: HashMap<TableKey, f64>,
}

impl ConversionTable {
    /// Load and validate the table from a JSON file. Fatal on any error.
    pub fn load<P: AsRef<Path>>(path: P) -> TableResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let data: ConversionData = serde_json::from_str(&contents)?;
        Self::from_records(data.records)
    }

    /// Build a table from an in-memory record list (also used by tests).
    pub fn from_records(records: Vec<ConversionRecord>) -> TableResult<Self> {
        if records.is_empty() {
            return Err(TableError::Empty);
        }

        let mut index = HashMap::with_capacity(records.len());
        for record in &records {
            let unit = UnitClass::from_str(&record.dose_unit).ok_or_else(|| {
                TableError::InvalidRecord {
                    drug: record.drug.clone(),
                    route: record.route.clone(),
                    reason: format!("unknown dose_unit '{}'", record.dose_unit),
                }
            })?;

            if !(record.to_ome > 0.0) {
                return Err(TableError::InvalidRecord {
                    drug: record.drug.clone(),
                    route: record.route.clone(),
                    reason: format!("to_ome must be positive, got {}", record.to_ome),
                });
            }

            let key = TableKey::new(&record.drug, &record.route, unit);
            if index.contains_key(&key) {
                // First record wins, matching the original linear search
                tracing::warn!(
                    "Duplicate conversion record for {}/{}/{}; keeping first",
                    key.drug,
                    key.route,
                    unit.as_str()
                );
                continue;
            }
            index.insert(key, record.to_ome);
        }

        Ok(Self { records, index })
    }

    /// Look up the OME conversion factor for a drug/route/unit-class
    /// combination. Drug and route are case-insensitive.
    pub fn factor(&self, drug: &str, route: &str, unit: UnitClass) -> Option<f64> {
        self.index
            .get(&TableKey::new(drug, route, unit))
            .copied()
    }

    /// All loaded records, in file order
    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    /// Number of loaded records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct drug names in the table, sorted
    pub fn drugs(&self) -> Vec<String> {
        let mut drugs: Vec<String> = self
            .records
            .iter()
            .map(|r| r.drug.trim().to_lowercase())
            .collect();
        drugs.sort();
        drugs.dedup();
        drugs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(drug: &str, route: &str, dose_unit: &str, to_ome: f64) -> ConversionRecord {
        ConversionRecord {
            drug: drug.into(),
            route: route.into(),
            dose_unit: dose_unit.into(),
            to_ome,
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table =
            ConversionTable::from_records(vec![record("morphine", "po", "mg/day", 1.0)]).unwrap();

        assert_eq!(table.factor("morphine", "po", UnitClass::MgPerDay), Some(1.0));
        assert_eq!(table.factor("Morphine", "PO", UnitClass::MgPerDay), Some(1.0));
        assert_eq!(table.factor(" morphine ", "po", UnitClass::MgPerDay), Some(1.0));
    }

    #[test]
    fn test_missing_combination_is_none() {
        let table =
            ConversionTable::from_records(vec![record("morphine", "po", "mg/day", 1.0)]).unwrap();

        assert_eq!(table.factor("morphine", "iv", UnitClass::MgPerDay), None);
        assert_eq!(table.factor("oxycodone", "po", UnitClass::MgPerDay), None);
        assert_eq!(table.factor("morphine", "po", UnitClass::McgPerDay), None);
    }

    #[test]
    fn test_duplicate_key_first_record_wins() {
        let table = ConversionTable::from_records(vec![
            record("morphine", "po", "mg/day", 1.0),
            record("morphine", "po", "mg/day", 2.0),
        ])
        .unwrap();

        assert_eq!(table.factor("morphine", "po", UnitClass::MgPerDay), Some(1.0));
        // Both records remain visible for enumeration
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_table_rejected() {
        let result = ConversionTable::from_records(vec![]);
        assert!(matches!(result, Err(TableError::Empty)));
    }

    #[test]
    fn test_unknown_unit_class_rejected() {
        let result = ConversionTable::from_records(vec![record("morphine", "po", "tablets", 1.0)]);
        assert!(matches!(result, Err(TableError::InvalidRecord { .. })));
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let zero = ConversionTable::from_records(vec![record("morphine", "po", "mg/day", 0.0)]);
        assert!(matches!(zero, Err(TableError::InvalidRecord { .. })));

        let negative =
            ConversionTable::from_records(vec![record("morphine", "po", "mg/day", -1.5)]);
        assert!(matches!(negative, Err(TableError::InvalidRecord { .. })));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ConversionTable::load("/nonexistent/conversion.json");
        assert!(matches!(result, Err(TableError::Io { .. })));
    }

    #[test]
    fn test_drugs_sorted_and_deduped() {
        let table = ConversionTable::from_records(vec![
            record("oxycodone", "po", "mg/day", 1.5),
            record("morphine", "po", "mg/day", 1.0),
            record("morphine", "iv", "mg/day", 3.0),
        ])
        .unwrap();

        assert_eq!(table.drugs(), vec!["morphine", "oxycodone"]);
    }
}
