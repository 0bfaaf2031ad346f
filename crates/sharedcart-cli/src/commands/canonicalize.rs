//! Canonicalize command implementation.

use crate::input;
use serde_json::Value;
use sharedcart_canonical::Canonicalizer;

pub fn run(source: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let json_str = input::read_input(source.as_deref(), None)?;

    let value: Value =
        serde_json::from_str(&json_str).map_err(|e| format!("Invalid JSON: {}", e))?;

    let result = Canonicalizer::settlement()
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", String::from_utf8_lossy(&result.bytes));
    Ok(())
}
