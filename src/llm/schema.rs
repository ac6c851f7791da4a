//! Structured-output schema for regimen extraction
//!
//! The extraction model is constrained to a closed vocabulary via a JSON
//! schema response format. The vocabulary lives here as consts so the schema
//! and any prompt text stay in one place.

use serde_json::{json, Value};

/// System prompt for the extraction model. The model must transcribe, never
/// calculate; all arithmetic happens in the conversion engine.
pub const SYSTEM_PROMPT: &str = "You are a medical assistant that parses opioid medication \
descriptions into structured data. Extract medications, routes, doses, units, and frequencies \
from natural language.\n\n\
CRITICAL: Only parse what is explicitly stated. DO NOT perform any calculations or conversions.\n\n\
Example: \"0.2mg hydromorphone every 6 hours\" should parse as:\n\
- dose: 0.2 (not 0.8)\n\
- units: \"mg\" (not \"mg/day\")\n\
- frequency: \"every 6 hours\"\n\n\
Return JSON with medications array containing drug, route, dose, units, and frequency fields.";

/// Opioids the extraction schema accepts
pub const DRUGS: &[&str] = &[
    "morphine",
    "oxycodone",
    "hydromorphone",
    "fentanyl",
    "methadone",
    "buprenorphine",
    "tramadol",
    "codeine",
    "hydrocodone",
    "oxymorphone",
    "levorphanol",
    "meperidine",
    "pentazocine",
    "tapentadol",
    "butorphanol",
    "diamorphine",
    "sufentanil",
    "pethidine",
    "dextropropoxyphene",
    "dihydrocodeine",
];

/// Administration routes the extraction schema accepts
pub const ROUTES: &[&str] = &["po", "iv", "im", "sc", "transdermal", "buc_sublingual", "rectal"];

/// Dose units the extraction schema accepts
pub const UNITS: &[&str] = &["mg", "mcg", "mg/hr", "mcg/hr"];

/// Frequency descriptors the extraction schema accepts
pub const FREQUENCIES: &[&str] = &[
    "daily",
    "twice daily",
    "three times daily",
    "four times daily",
    "every 4 hours",
    "every 6 hours",
    "every 8 hours",
    "every 12 hours",
    "q4h",
    "q6h",
    "q8h",
    "q12h",
    "bid",
    "tid",
    "qid",
    "prn",
    "as needed",
];

/// JSON schema for the structured-output response format.
pub fn regimen_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "medications": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "drug": { "type": "string", "enum": DRUGS },
                        "route": { "type": "string", "enum": ROUTES },
                        "dose": { "type": "number" },
                        "units": { "type": "string", "enum": UNITS },
                        "frequency": { "type": "string", "enum": FREQUENCIES }
                    },
                    "required": ["drug", "route", "dose", "units"]
                }
            }
        },
        "required": ["medications"]
    })
}
