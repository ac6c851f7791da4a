//! Opioid Equianalgesic Calculator (omecalc)
//!
//! An MCP server for opioid regimen OME conversion.

use std::path::PathBuf;
use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

mod build_info;
mod conversion;
mod llm;
mod mcp;
mod models;
mod tools;

use conversion::ConversionTable;
use mcp::OmeService;

/// Get the conversion table path from environment or use default
fn get_table_path() -> PathBuf {
    std::env::var("OMECALC_TABLE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("conversion.json");
            path
        })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("omecalc=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    // Load the conversion table; the service cannot run without it
    let table_path = get_table_path();
    eprintln!("Conversion table path: {}", table_path.display());

    let table = ConversionTable::load(&table_path)?;
    eprintln!(
        "Loaded {} conversion records ({} drugs)",
        table.len(),
        table.drugs().len()
    );

    // Create the calculator service
    let service = OmeService::new(table_path, table);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
