//! OME arithmetic
//!
//! Pure functions over the loaded conversion table: per-medication daily
//! dose, total regimen OME, and inversion of an OME total into a target
//! drug's dose. Lookup misses are policy, not errors: an unrecognized
//! medication contributes zero, and an unrecognized target falls back to
//! reporting oral morphine (1:1 with OME by definition).

use crate::models::{ConversionResult, Medication, Regimen};

use super::frequency::daily_multiplier;
use super::table::ConversionTable;
use super::units::{normalize_unit, UnitClass};

/// Per-medication contribution to the regimen total.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MedicationOme {
    pub drug: String,
    pub route: String,
    pub dose: f64,
    pub units: String,
    pub frequency: Option<String>,
    /// Unit class used for the table lookup, if the unit was recognized
    pub unit_class: Option<UnitClass>,
    /// Computed daily dose in the stated unit, when the entry was counted
    pub daily_dose: Option<f64>,
    /// Conversion factor found in the table, if any
    pub factor: Option<f64>,
    /// OME contribution in mg/day; zero for skipped entries
    pub ome: f64,
}

/// Total OME for a regimen plus the per-medication breakdown.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RegimenOme {
    pub total_ome: f64,
    pub medications: Vec<MedicationOme>,
}

/// Convert a medication's stated dose to a daily dose in its stated unit.
///
/// Hourly-rate units already describe continuous dosing and pass through
/// unchanged regardless of any frequency descriptor. Single-dose units are
/// multiplied by the frequency's daily multiplier; with no frequency the
/// stated dose is taken as a daily total.
pub fn daily_dose(med: &Medication) -> f64 {
    if let Some(unit) = normalize_unit(&med.units) {
        if unit.is_hourly() {
            return med.dose;
        }
    }

    match &med.frequency {
        Some(frequency) => med.dose * daily_multiplier(frequency) as f64,
        None => med.dose,
    }
}

/// Compute the total daily OME for a regimen with per-medication detail.
///
/// Entries whose unit is unrecognized or whose (drug, route, unit) has no
/// table record contribute zero and are kept in the breakdown with the
/// missing piece marked `None`.
pub fn regimen_ome(table: &ConversionTable, regimen: &Regimen) -> RegimenOme {
    let mut total = 0.0;
    let mut medications = Vec::with_capacity(regimen.medications.len());

    for med in &regimen.medications {
        let unit_class = normalize_unit(&med.units);

        let Some(unit) = unit_class else {
            tracing::warn!(
                "Skipping {} {} {}: unrecognized unit",
                med.drug,
                med.dose,
                med.units
            );
            medications.push(skipped(med, None));
            continue;
        };

        let Some(factor) = table.factor(&med.drug, &med.route, unit) else {
            tracing::warn!(
                "Skipping {} {} {} ({}): no conversion factor",
                med.drug,
                med.dose,
                med.units,
                med.route
            );
            medications.push(skipped(med, Some(unit)));
            continue;
        };

        let daily = daily_dose(med);
        let ome = daily * factor;
        tracing::debug!(
            "{} {} {} ({}) -> daily dose {} x factor {} = {} mg/day OME",
            med.drug,
            med.dose,
            med.units,
            med.route,
            daily,
            factor,
            ome
        );
        total += ome;

        medications.push(MedicationOme {
            drug: med.drug.clone(),
            route: med.route.clone(),
            dose: med.dose,
            units: med.units.clone(),
            frequency: med.frequency.clone(),
            unit_class: Some(unit),
            daily_dose: Some(daily),
            factor: Some(factor),
            ome,
        });
    }

    RegimenOme {
        total_ome: total,
        medications,
    }
}

/// Total daily OME for a regimen, mg/day.
pub fn total_ome(table: &ConversionTable, regimen: &Regimen) -> f64 {
    regimen_ome(table, regimen).total_ome
}

/// Invert an OME total into an equianalgesic dose of the target drug.
///
/// Looks up the target's mg/day factor; if absent, the result is relabeled
/// as oral morphine with the OME total unchanged. This fallback always
/// succeeds and is never surfaced as an error.
pub fn convert_from_ome(
    table: &ConversionTable,
    ome_total: f64,
    target_drug: &str,
    target_route: &str,
) -> ConversionResult {
    match table.factor(target_drug, target_route, UnitClass::MgPerDay) {
        Some(factor) => ConversionResult {
            total_ome: ome_total,
            target_drug: target_drug.trim().to_lowercase(),
            target_route: target_route.trim().to_lowercase(),
            target_dose: ome_total / factor,
            target_units: "mg/day".to_string(),
        },
        None => {
            tracing::warn!(
                "No conversion factor for target {}/{}; reporting oral morphine",
                target_drug,
                target_route
            );
            ConversionResult {
                total_ome: ome_total,
                target_drug: "morphine".to_string(),
                target_route: "po".to_string(),
                target_dose: ome_total,
                target_units: "mg/day".to_string(),
            }
        }
    }
}

fn skipped(med: &Medication, unit_class: Option<UnitClass>) -> MedicationOme {
    MedicationOme {
        drug: med.drug.clone(),
        route: med.route.clone(),
        dose: med.dose,
        units: med.units.clone(),
        frequency: med.frequency.clone(),
        unit_class,
        daily_dose: None,
        factor: None,
        ome: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::table::ConversionRecord;

    const EPSILON: f64 = 1e-9;

    fn record(drug: &str, route: &str, dose_unit: &str, to_ome: f64) -> ConversionRecord {
        ConversionRecord {
            drug: drug.into(),
            route: route.into(),
            dose_unit: dose_unit.into(),
            to_ome,
        }
    }

    fn test_table() -> ConversionTable {
        ConversionTable::from_records(vec![
            record("morphine", "po", "mg/day", 1.0),
            record("morphine", "iv", "mg/day", 3.0),
            record("oxycodone", "po", "mg/day", 1.5),
            record("hydromorphone", "po", "mg/day", 4.0),
            record("fentanyl", "transdermal", "mcg/hr", 2.4),
            record("tramadol", "po", "mg/day", 0.1),
        ])
        .unwrap()
    }

    #[test]
    fn test_daily_dose_with_frequency() {
        let med = Medication::new("morphine", "po", 30.0, "mg").with_frequency("twice daily");
        assert!((daily_dose(&med) - 60.0).abs() < EPSILON);
    }

    #[test]
    fn test_daily_dose_without_frequency_is_stated_dose() {
        let med = Medication::new("morphine", "po", 90.0, "mg");
        assert!((daily_dose(&med) - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_hourly_rate_ignores_frequency() {
        // A patch rate is continuous; any frequency descriptor is meaningless
        for freq in ["twice daily", "q4h", "prn", "nonsense"] {
            let med = Medication::new("fentanyl", "transdermal", 25.0, "mcg/hr")
                .with_frequency(freq);
            assert!((daily_dose(&med) - 25.0).abs() < EPSILON);
        }
    }

    #[test]
    fn test_empty_regimen_is_zero() {
        let table = test_table();
        assert_eq!(total_ome(&table, &Regimen::default()), 0.0);
    }

    #[test]
    fn test_morphine_po_bid_scenario() {
        // 30 mg po bid -> 60 mg/day, factor 1.0 -> 60 OME
        let table = test_table();
        let regimen = Regimen::new(vec![
            Medication::new("morphine", "po", 30.0, "mg").with_frequency("twice daily"),
        ]);

        let result = regimen_ome(&table, &regimen);
        assert!((result.total_ome - 60.0).abs() < EPSILON);
        assert_eq!(result.medications[0].daily_dose, Some(60.0));
        assert_eq!(result.medications[0].factor, Some(1.0));

        let converted = convert_from_ome(&table, result.total_ome, "morphine", "po");
        assert!((converted.target_dose - 60.0).abs() < EPSILON);
        assert_eq!(converted.target_units, "mg/day");
    }

    #[test]
    fn test_fentanyl_patch_scenario() {
        // 25 mcg/hr transdermal -> daily dose 25, factor 2.4 -> 60 OME
        let table = test_table();
        let regimen = Regimen::new(vec![Medication::new(
            "fentanyl",
            "transdermal",
            25.0,
            "mcg/hr",
        )]);

        assert!((total_ome(&table, &regimen) - 60.0).abs() < EPSILON);
    }

    #[test]
    fn test_unrecognized_drug_contributes_zero() {
        let table = test_table();
        let regimen = Regimen::new(vec![Medication::new("ibuprofen", "po", 800.0, "mg")]);

        let result = regimen_ome(&table, &regimen);
        assert_eq!(result.total_ome, 0.0);
        assert_eq!(result.medications.len(), 1);
        assert_eq!(result.medications[0].factor, None);
    }

    #[test]
    fn test_unrecognized_unit_contributes_zero() {
        let table = test_table();
        let regimen = Regimen::new(vec![Medication::new("morphine", "po", 2.0, "tablets")]);

        let result = regimen_ome(&table, &regimen);
        assert_eq!(result.total_ome, 0.0);
        assert_eq!(result.medications[0].unit_class, None);
    }

    #[test]
    fn test_mixed_regimen_skips_unknown_and_sums_rest() {
        let table = test_table();
        let regimen = Regimen::new(vec![
            Medication::new("oxycodone", "po", 10.0, "mg").with_frequency("qid"),
            Medication::new("mysterydrug", "po", 50.0, "mg"),
            Medication::new("fentanyl", "transdermal", 12.5, "mcg/hr"),
        ]);

        // 10 * 4 * 1.5 = 60, mystery = 0, 12.5 * 2.4 = 30
        assert!((total_ome(&table, &regimen) - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_order_independence() {
        let table = test_table();
        let meds = vec![
            Medication::new("morphine", "po", 15.0, "mg").with_frequency("tid"),
            Medication::new("oxycodone", "po", 5.0, "mg").with_frequency("q6h"),
            Medication::new("fentanyl", "transdermal", 25.0, "mcg/hr"),
            Medication::new("tramadol", "po", 50.0, "mg").with_frequency("prn"),
        ];

        let forward = total_ome(&table, &Regimen::new(meds.clone()));
        let mut reversed = meds.clone();
        reversed.reverse();
        let backward = total_ome(&table, &Regimen::new(reversed));

        assert!((forward - backward).abs() < EPSILON);
    }

    #[test]
    fn test_total_is_non_negative() {
        let table = test_table();
        let regimen = Regimen::new(vec![
            Medication::new("morphine", "po", 0.0, "mg"),
            Medication::new("oxycodone", "po", 2.5, "mg"),
        ]);
        assert!(total_ome(&table, &regimen) >= 0.0);
    }

    #[test]
    fn test_target_conversion_divides_by_factor() {
        let table = test_table();
        let result = convert_from_ome(&table, 60.0, "oxycodone", "po");

        assert_eq!(result.target_drug, "oxycodone");
        assert_eq!(result.target_route, "po");
        assert!((result.target_dose - 40.0).abs() < EPSILON);
        assert_eq!(result.target_units, "mg/day");
    }

    #[test]
    fn test_target_lookup_case_insensitive() {
        let table = test_table();
        let result = convert_from_ome(&table, 60.0, "Hydromorphone", "PO");

        assert_eq!(result.target_drug, "hydromorphone");
        assert!((result.target_dose - 15.0).abs() < EPSILON);
    }

    #[test]
    fn test_unknown_target_falls_back_to_oral_morphine() {
        let table = test_table();
        let result = convert_from_ome(&table, 42.0, "methadone", "po");

        assert_eq!(result.target_drug, "morphine");
        assert_eq!(result.target_route, "po");
        assert!((result.target_dose - 42.0).abs() < EPSILON);
        assert_eq!(result.target_units, "mg/day");
    }

    #[test]
    fn test_iv_route_uses_iv_factor() {
        let table = test_table();
        let result = convert_from_ome(&table, 90.0, "morphine", "iv");

        assert_eq!(result.target_route, "iv");
        assert!((result.target_dose - 30.0).abs() < EPSILON);
    }
}
