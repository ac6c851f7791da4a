//! Medication model
//!
//! A single opioid medication as stated by the patient or prescriber: drug,
//! route of administration, dose, dose unit, and optional frequency.

use serde::{Deserialize, Serialize};

/// One opioid medication in a regimen.
///
/// Drug, route, and units are kept as free strings: an entry the conversion
/// table does not recognize must degrade to a zero OME contribution, never to
/// a deserialization failure. Case is ignored at lookup time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    /// Drug name (e.g., "morphine", "oxycodone", "fentanyl")
    pub drug: String,
    /// Administration route (e.g., "po", "iv", "transdermal")
    pub route: String,
    /// Stated numeric dose
    pub dose: f64,
    /// Dose unit as stated: "mg", "mcg", "mg/hr", or "mcg/hr"
    pub units: String,
    /// Frequency descriptor (e.g., "twice daily", "q6h"); absent means the
    /// stated dose is already a daily total
    #[serde(default)]
    pub frequency: Option<String>,
}

impl Medication {
    pub fn new(drug: &str, route: &str, dose: f64, units: &str) -> Self {
        Self {
            drug: drug.to_string(),
            route: route.to_string(),
            dose,
            units: units.to_string(),
            frequency: None,
        }
    }

    pub fn with_frequency(mut self, frequency: &str) -> Self {
        self.frequency = Some(frequency.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_defaults_to_none_on_deserialize() {
        let med: Medication =
            serde_json::from_str(r#"{"drug":"morphine","route":"po","dose":30.0,"units":"mg"}"#)
                .unwrap();
        assert_eq!(med.frequency, None);
        assert_eq!(med.dose, 30.0);
    }

    #[test]
    fn test_builder_helpers() {
        let med = Medication::new("oxycodone", "po", 10.0, "mg").with_frequency("bid");
        assert_eq!(med.frequency.as_deref(), Some("bid"));
    }
}
