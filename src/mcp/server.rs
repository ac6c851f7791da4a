//! Calculator MCP Server Implementation
//!
//! Implements the MCP server exposing the conversion and parsing tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::conversion::ConversionTable;
use crate::llm::LlmClient;
use crate::models::{Medication, Regimen};
use crate::tools::convert;
use crate::tools::parse;
use crate::tools::status::{StatusTracker, CALCULATOR_INSTRUCTIONS};

/// Calculator MCP Service
#[derive(Clone)]
pub struct OmeService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    table: Arc<ConversionTable>,
    tool_router: ToolRouter<OmeService>,
}

impl OmeService {
    pub fn new(table_path: PathBuf, table: ConversionTable) -> Self {
        let tracker = StatusTracker::new(table_path, table.len(), table.drugs().len());
        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            table: Arc::new(table),
            tool_router: Self::tool_router(),
        }
    }

    /// Build the extraction client on demand so a missing API key only
    /// affects the parsing tools, never the arithmetic ones.
    fn llm_client(&self) -> Result<LlmClient, McpError> {
        LlmClient::from_env().map_err(|e| McpError::internal_error(e.to_string(), None))
    }
}

// ============================================================================
// Parameter Structs
// ============================================================================

/// One medication as stated, without any pre-computation
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MedicationParam {
    /// Drug name, e.g. "morphine", "oxycodone", "fentanyl"
    pub drug: String,
    /// Route: po, iv, im, sc, transdermal, buc_sublingual, or rectal
    pub route: String,
    /// Single-dose amount as stated, never multiplied by frequency
    pub dose: f64,
    /// Dose unit: mg, mcg, mg/hr, or mcg/hr
    pub units: String,
    /// Frequency descriptor, e.g. "twice daily", "q6h". Omit when the dose
    /// is already a daily total or an hourly rate.
    pub frequency: Option<String>,
}

impl From<MedicationParam> for Medication {
    fn from(p: MedicationParam) -> Self {
        Medication {
            drug: p.drug,
            route: p.route,
            dose: p.dose,
            units: p.units,
            frequency: p.frequency,
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertRegimenParams {
    /// The patient's current opioid medications
    pub medications: Vec<MedicationParam>,
    /// Drug to convert the total OME into
    pub target_drug: String,
    /// Target route (default "po")
    #[serde(default = "default_target_route")]
    pub target_route: String,
}

fn default_target_route() -> String {
    "po".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ParseRegimenParams {
    /// Free-text description of the opioid regimen
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertTextParams {
    /// Free-text description of the opioid regimen
    pub text: String,
    /// Drug to convert the total OME into
    pub target_drug: String,
    /// Target route (default "po")
    #[serde(default = "default_target_route")]
    pub target_route: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl OmeService {
    // --- Status ---

    #[tool(description = "Get the current status of the calculator service including build info, conversion table status, and process information")]
    async fn calculator_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get usage instructions for the opioid conversion tools. Call this when starting a conversion session or when unsure how to structure medication input.")]
    fn conversion_instructions(&self) -> Result<CallToolResult, McpError> {
        Ok(CallToolResult::success(vec![Content::text(
            CALCULATOR_INSTRUCTIONS,
        )]))
    }

    // --- Conversion ---

    #[tool(description = "Convert a structured opioid regimen into total daily oral morphine equivalents (OME) and an equianalgesic dose of a target drug. Unrecognized medications contribute zero and are flagged in the breakdown.")]
    fn convert_regimen(&self, Parameters(p): Parameters<ConvertRegimenParams>) -> Result<CallToolResult, McpError> {
        let regimen = Regimen::new(p.medications.into_iter().map(Medication::from).collect());
        let result = convert::convert_regimen(&self.table, &regimen, &p.target_drug, &p.target_route)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "List every conversion factor in the loaded table, plus the distinct supported drug names")]
    fn list_conversion_factors(&self) -> Result<CallToolResult, McpError> {
        let result = convert::list_conversion_factors(&self.table)
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Natural language ---

    #[tool(description = "Parse a free-text opioid regimen description into structured medications. Doses and frequencies are transcribed exactly as stated, never calculated. Requires OPENAI_API_KEY.")]
    async fn parse_regimen(&self, Parameters(p): Parameters<ParseRegimenParams>) -> Result<CallToolResult, McpError> {
        let client = self.llm_client()?;
        let result = parse::parse_regimen(&client, &p.text)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Parse a free-text opioid regimen description and convert it to the target drug in one step. Requires OPENAI_API_KEY.")]
    async fn convert_text(&self, Parameters(p): Parameters<ConvertTextParams>) -> Result<CallToolResult, McpError> {
        let client = self.llm_client()?;
        let result = parse::convert_text(&client, &self.table, &p.text, &p.target_drug, &p.target_route)
            .await
            .map_err(|e| McpError::internal_error(e, None))?;
        let json = serde_json::to_string_pretty(&result).map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for OmeService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "omecalc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Opioid Equianalgesic Calculator".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Opioid Equianalgesic Calculator (omecalc) - converts opioid regimens to total \
                 daily oral morphine equivalents (OME) and equianalgesic target doses. \
                 IMPORTANT: Call conversion_instructions before structuring medication input. \
                 Structured input: convert_regimen. \
                 Free text: parse_regimen (extract only) or convert_text (extract and convert). \
                 Reference: list_conversion_factors for supported drugs/routes/units. \
                 Doses are transcribed as stated; all arithmetic is table-driven. Unrecognized \
                 medications contribute zero OME and are flagged in the breakdown. Results are \
                 equianalgesic arithmetic, not dosing recommendations."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ConversionRecord;

    fn service() -> OmeService {
        let table = ConversionTable::from_records(vec![ConversionRecord {
            drug: "morphine".into(),
            route: "po".into(),
            dose_unit: "mg/day".into(),
            to_ome: 1.0,
        }])
        .unwrap();
        OmeService::new(PathBuf::from("/tmp/conversion.json"), table)
    }

    #[test]
    fn test_medication_param_conversion() {
        let p = MedicationParam {
            drug: "morphine".into(),
            route: "po".into(),
            dose: 30.0,
            units: "mg".into(),
            frequency: Some("bid".into()),
        };
        let med = Medication::from(p);
        assert_eq!(med.frequency.as_deref(), Some("bid"));
    }

    #[tokio::test]
    async fn test_convert_regimen_tool() {
        let svc = service();
        let params = ConvertRegimenParams {
            medications: vec![MedicationParam {
                drug: "morphine".into(),
                route: "po".into(),
                dose: 30.0,
                units: "mg".into(),
                frequency: Some("twice daily".into()),
            }],
            target_drug: "morphine".into(),
            target_route: "po".into(),
        };
        let result = svc.convert_regimen(Parameters(params)).unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }

    #[tokio::test]
    async fn test_status_tool() {
        let svc = service();
        let result = svc.calculator_status().await.unwrap();
        assert!(!result.is_error.unwrap_or(false));
    }
}
