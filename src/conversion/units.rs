//! Dose unit classes and normalization
//!
//! The conversion table is keyed by four normalized unit classes. Plain "mg"
//! and "mcg" inputs are single-dose amounts that key into the per-day classes
//! (the daily dose calculator applies any frequency multiplier); hourly-rate
//! units describe continuous delivery and are kept as-is.

use serde::{Deserialize, Serialize};

/// Normalized dose-unit class used for table lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    /// Milligrams per day
    #[serde(rename = "mg/day")]
    MgPerDay,
    /// Micrograms per day
    #[serde(rename = "mcg/day")]
    McgPerDay,
    /// Micrograms per hour (infusion/patch rate)
    #[serde(rename = "mcg/hr")]
    McgPerHour,
    /// Milligrams per hour (infusion rate)
    #[serde(rename = "mg/hr")]
    MgPerHour,
}

impl UnitClass {
    /// Get the canonical unit string for this class
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitClass::MgPerDay => "mg/day",
            UnitClass::McgPerDay => "mcg/day",
            UnitClass::McgPerHour => "mcg/hr",
            UnitClass::MgPerHour => "mg/hr",
        }
    }

    /// Parse a canonical unit-class string (as stored in the table)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim() {
            "mg/day" => Some(UnitClass::MgPerDay),
            "mcg/day" => Some(UnitClass::McgPerDay),
            "mcg/hr" => Some(UnitClass::McgPerHour),
            "mg/hr" => Some(UnitClass::MgPerHour),
            _ => None,
        }
    }

    /// Hourly-rate classes are never multiplied by a frequency
    pub fn is_hourly(&self) -> bool {
        matches!(self, UnitClass::McgPerHour | UnitClass::MgPerHour)
    }
}

/// Map a stated dose-unit token to the unit class used for table lookup.
///
/// Returns `None` for an unrecognized token; the caller treats that
/// medication as contributing zero OME rather than failing the calculation.
pub fn normalize_unit(units: &str) -> Option<UnitClass> {
    match units.to_lowercase().trim() {
        "mg" | "mg/day" => Some(UnitClass::MgPerDay),
        "mcg" | "mcg/day" => Some(UnitClass::McgPerDay),
        "mcg/hr" => Some(UnitClass::McgPerHour),
        "mg/hr" => Some(UnitClass::MgPerHour),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_dose_units_key_into_day_classes() {
        assert_eq!(normalize_unit("mg"), Some(UnitClass::MgPerDay));
        assert_eq!(normalize_unit("mcg"), Some(UnitClass::McgPerDay));
        assert_eq!(normalize_unit("mg/day"), Some(UnitClass::MgPerDay));
        assert_eq!(normalize_unit("mcg/day"), Some(UnitClass::McgPerDay));
    }

    #[test]
    fn test_hourly_rates_kept_as_is() {
        assert_eq!(normalize_unit("mcg/hr"), Some(UnitClass::McgPerHour));
        assert_eq!(normalize_unit("mg/hr"), Some(UnitClass::MgPerHour));
        assert!(UnitClass::McgPerHour.is_hourly());
        assert!(UnitClass::MgPerHour.is_hourly());
        assert!(!UnitClass::MgPerDay.is_hourly());
        assert!(!UnitClass::McgPerDay.is_hourly());
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(normalize_unit("MG"), Some(UnitClass::MgPerDay));
        assert_eq!(normalize_unit(" Mcg/Hr "), Some(UnitClass::McgPerHour));
    }

    #[test]
    fn test_unknown_unit_is_none() {
        assert_eq!(normalize_unit("tablets"), None);
        assert_eq!(normalize_unit("ml"), None);
        assert_eq!(normalize_unit(""), None);
    }

    #[test]
    fn test_canonical_round_trip() {
        for class in [
            UnitClass::MgPerDay,
            UnitClass::McgPerDay,
            UnitClass::McgPerHour,
            UnitClass::MgPerHour,
        ] {
            assert_eq!(UnitClass::from_str(class.as_str()), Some(class));
        }
    }
}
