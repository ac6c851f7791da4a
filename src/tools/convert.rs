//! Conversion MCP tools
//!
//! Tool-layer wrappers around the conversion engine: regimen-to-target
//! conversion and table enumeration.

use serde::Serialize;

use crate::conversion::{self, ConversionTable, MedicationOme};
use crate::models::{ConversionResult, Regimen};

/// Response for convert_regimen
#[derive(Debug, Serialize)]
pub struct ConvertRegimenResponse {
    pub result: ConversionResult,
    /// Per-medication OME contributions, including skipped entries
    pub breakdown: Vec<MedicationOme>,
}

/// Response for list_conversion_factors
#[derive(Debug, Serialize)]
pub struct ListFactorsResponse {
    pub records: Vec<FactorSummary>,
    pub drugs: Vec<String>,
    pub total: usize,
}

/// One conversion-table entry for listing
#[derive(Debug, Serialize)]
pub struct FactorSummary {
    pub drug: String,
    pub route: String,
    pub dose_unit: String,
    pub to_ome: f64,
}

/// Convert a structured regimen into a total OME and an equianalgesic dose
/// of the target drug. Never fails on regimen content; entries the table
/// does not recognize simply contribute zero.
pub fn convert_regimen(
    table: &ConversionTable,
    regimen: &Regimen,
    target_drug: &str,
    target_route: &str,
) -> Result<ConvertRegimenResponse, String> {
    let ome = conversion::regimen_ome(table, regimen);
    let result = conversion::convert_from_ome(table, ome.total_ome, target_drug, target_route);

    tracing::info!(
        "Converted {} medication(s): {} mg/day OME -> {} {} {}",
        regimen.len(),
        ome.total_ome,
        result.target_dose,
        result.target_units,
        result.target_drug
    );

    Ok(ConvertRegimenResponse {
        result,
        breakdown: ome.medications,
    })
}

/// List every loaded conversion record plus the distinct drug names.
pub fn list_conversion_factors(table: &ConversionTable) -> Result<ListFactorsResponse, String> {
    let records: Vec<FactorSummary> = table
        .records()
        .iter()
        .map(|r| FactorSummary {
            drug: r.drug.clone(),
            route: r.route.clone(),
            dose_unit: r.dose_unit.clone(),
            to_ome: r.to_ome,
        })
        .collect();

    let total = records.len();
    Ok(ListFactorsResponse {
        records,
        drugs: table.drugs(),
        total,
    })
}
