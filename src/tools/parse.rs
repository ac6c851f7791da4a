//! Natural-language parsing MCP tools
//!
//! Free-text regimen descriptions are sent to the extraction model and come
//! back as structured regimens. `convert_text` chains extraction into the
//! conversion engine for a one-call workflow.

use serde::Serialize;

use crate::conversion::ConversionTable;
use crate::llm::LlmClient;
use crate::models::Regimen;

use super::convert::{convert_regimen, ConvertRegimenResponse};

/// Response for parse_regimen
#[derive(Debug, Serialize)]
pub struct ParseRegimenResponse {
    pub regimen: Regimen,
}

/// Response for convert_text
#[derive(Debug, Serialize)]
pub struct ConvertTextResponse {
    /// Regimen as extracted from the input text
    pub regimen: Regimen,
    pub result: ConvertRegimenResponse,
}

/// Parse a free-text regimen description into structured medications.
pub async fn parse_regimen(client: &LlmClient, text: &str) -> Result<ParseRegimenResponse, String> {
    let regimen = client
        .parse_regimen(text)
        .await
        .map_err(|e| format!("Failed to parse regimen text: {}", e))?;

    tracing::info!(
        "Extracted {} medication(s) from text ({} chars)",
        regimen.len(),
        text.len()
    );

    Ok(ParseRegimenResponse { regimen })
}

/// Parse free text and convert the extracted regimen in one step.
pub async fn convert_text(
    client: &LlmClient,
    table: &ConversionTable,
    text: &str,
    target_drug: &str,
    target_route: &str,
) -> Result<ConvertTextResponse, String> {
    let parsed = parse_regimen(client, text).await?;
    let result = convert_regimen(table, &parsed.regimen, target_drug, target_route)?;

    Ok(ConvertTextResponse {
        regimen: parsed.regimen,
        result,
    })
}
