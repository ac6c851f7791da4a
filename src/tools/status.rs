//! Calculator status tool
//!
//! Runtime status information about the calculator service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Usage instructions for AI assistants
pub const CALCULATOR_INSTRUCTIONS: &str = r#"
# Opioid Equianalgesic Calculator Instructions

This guide explains how to convert opioid regimens using the omecalc tools.

## Overview

The calculator converts a patient's opioid regimen into a total daily oral
morphine equivalent (OME, mg/day) and then into an equianalgesic dose of a
target drug. All arithmetic is table-driven; the server never estimates or
rounds clinically.

## Workflow

### Structured input

Use `convert_regimen` when you already have the medications as structured data:

```
convert_regimen(
  medications: [
    {drug: "morphine", route: "po", dose: 30, units: "mg", frequency: "twice daily"},
    {drug: "fentanyl", route: "transdermal", dose: 25, units: "mcg/hr"}
  ],
  target_drug: "oxycodone",
  target_route: "po"
)
```

### Free text input

Use `parse_regimen` to extract structured medications from a description like
"morphine 30mg twice daily and a 25 mcg/hr fentanyl patch", then review the
extraction with the user before converting. Use `convert_text` to do both
steps in one call when no review is needed.

## Field Rules

- **dose** is the single-dose amount as stated, never pre-multiplied.
  "0.2mg every 6 hours" is dose 0.2 with frequency "every 6 hours", not 0.8.
- **units** is one of: mg, mcg, mg/hr, mcg/hr. Patch and infusion rates use
  the hourly units and must NOT carry a frequency multiplier.
- **frequency** is optional. When absent, the dose is treated as a daily
  total. Recognized values include: daily, twice daily, three times daily,
  four times daily, every 4/6/8/12 hours, q4h, q6h, q8h, q12h, bid, tid,
  qid, prn, as needed.
- **target_route** defaults to "po" when omitted.

## Behavior to Expect

- Medications the conversion table does not recognize contribute zero OME;
  they appear in the response breakdown with no factor. Tell the user when
  an entry was skipped.
- If the target drug/route has no table entry, the result falls back to
  oral morphine (morphine, po, mg/day) with the OME total as the dose.
- PRN medications count as one dose per day.

## Quick Reference

| Task | Tool |
|------|------|
| Convert structured regimen | `convert_regimen` |
| Extract regimen from text | `parse_regimen` |
| Extract and convert in one call | `convert_text` |
| List supported drugs/factors | `list_conversion_factors` |
| Service status | `calculator_status` |

## Notes

- Results are equianalgesic arithmetic, not dosing recommendations.
  Cross-tolerance reduction and clinical judgment are the prescriber's job.
- Drug and route matching is case-insensitive.
"#;

/// Runtime status of the calculator service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Conversion table information
    pub table_path: String,
    pub table_records: usize,
    pub table_drugs: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    table_path: PathBuf,
    table_records: usize,
    table_drugs: usize,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(table_path: PathBuf, table_records: usize, table_drugs: usize) -> Self {
        Self {
            start_time: Instant::now(),
            table_path,
            table_records,
            table_drugs,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            table_path: self.table_path.display().to_string(),
            table_records: self.table_records,
            table_drugs: self.table_drugs,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
