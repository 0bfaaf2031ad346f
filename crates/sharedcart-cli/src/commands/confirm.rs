//! Confirm command implementation.

use crate::input;
use crate::output;
use sharedcart_core::{compute_settlement, SettlementConfirmation};

pub fn run(
    request: Option<String>,
    out: Option<String>,
    max_size: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = input::load_request(request.as_deref(), max_size)?;
    let result = compute_settlement(&request)?;
    let confirmation = SettlementConfirmation::from_result(&result)?;
    let rendered = output::format_json(&confirmation);

    match out {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", rendered))
                .map_err(|e| format!("Failed to write {}: {}", path, e))?;
            tracing::info!(
                path = %path,
                digest = %confirmation.settlement_digest,
                "confirmation written"
            );
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
