//! Simple utility to validate a conversion table file
//! Usage: cargo run --bin validate_table -- [path]

use std::collections::HashMap;
use std::path::PathBuf;

fn get_table_path() -> PathBuf {
    std::env::var("OMECALC_TABLE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

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

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(get_table_path);

    println!("Conversion table: {}", path.display());

    let table = match omecalc::conversion::ConversionTable::load(&path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("INVALID: {}", e);
            std::process::exit(1);
        }
    };

    let mut routes: Vec<String> = table
        .records()
        .iter()
        .map(|r| r.route.trim().to_lowercase())
        .collect();
    routes.sort();
    routes.dedup();

    println!("Records: {}", table.len());
    println!("Drugs:   {}", table.drugs().len());
    println!("Routes:  {}", routes.len());

    // Count duplicate (drug, route, unit) combinations; only the first of
    // each is used for lookups
    let mut seen: HashMap<(String, String, String), usize> = HashMap::new();
    for record in table.records() {
        let key = (
            record.drug.trim().to_lowercase(),
            record.route.trim().to_lowercase(),
            record.dose_unit.trim().to_lowercase(),
        );
        *seen.entry(key).or_insert(0) += 1;
    }

    let mut duplicates: Vec<_> = seen.iter().filter(|(_, &n)| n > 1).collect();
    duplicates.sort();
    if duplicates.is_empty() {
        println!("No duplicate records.");
    } else {
        println!("Duplicate records (first occurrence wins):");
        for ((drug, route, unit), count) in duplicates {
            println!("  {}/{}/{}: {} records", drug, route, unit, count);
        }
    }

    println!("\nDrugs in table:");
    for drug in table.drugs() {
        println!("  {}", drug);
    }

    println!("\nTable is valid.");
}
