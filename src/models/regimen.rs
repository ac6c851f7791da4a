//! Regimen and conversion request/result models.

use serde::{Deserialize, Serialize};

use super::Medication;

/// A patient's complete opioid regimen: zero or more independent medications.
/// Order carries no meaning; total OME is a commutative sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Regimen {
    pub medications: Vec<Medication>,
}

impl Regimen {
    pub fn new(medications: Vec<Medication>) -> Self {
        Self { medications }
    }

    pub fn is_empty(&self) -> bool {
        self.medications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.medications.len()
    }
}

/// A request to convert a regimen into an equianalgesic dose of a target drug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub regimen: Regimen,
    pub target_drug: String,
    /// Target route; defaults to oral
    #[serde(default = "default_target_route")]
    pub target_route: String,
}

fn default_target_route() -> String {
    "po".to_string()
}

/// The outcome of a conversion: total daily OME and the resolved target dose.
///
/// `target_units` is always "mg/day" in the current design. When no factor
/// exists for the requested target, the result reports the OME total as oral
/// morphine (morphine po is 1:1 with OME by definition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Total daily oral morphine equivalent, mg/day
    pub total_ome: f64,
    /// Resolved target drug (requested drug, or "morphine" on fallback)
    pub target_drug: String,
    /// Resolved target route (requested route, or "po" on fallback)
    pub target_route: String,
    /// Computed equianalgesic dose of the target drug
    pub target_dose: f64,
    /// Unit of the target dose
    pub target_units: String,
}
