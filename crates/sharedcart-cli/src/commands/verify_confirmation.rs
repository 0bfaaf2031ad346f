//! Verify-confirmation command implementation.

use crate::input;
use sharedcart_core::{confirm_request, SettlementConfirmation};

pub fn run(request: String, confirmation: String) -> Result<(), Box<dyn std::error::Error>> {
    let request = input::load_request(Some(request.as_str()), None)?;
    let raw = input::read_input(Some(confirmation.as_str()), None)?;
    let confirmation: SettlementConfirmation =
        serde_json::from_str(&raw).map_err(|e| format!("Invalid confirmation JSON: {}", e))?;

    let result = confirm_request(&request, &confirmation)?;
    tracing::debug!(members = result.balances.len(), "confirmation matches");

    println!(
        "OK: {} bills, {} transfers, digest {}",
        confirmation.bill_ids.len(),
        confirmation.transactions.len(),
        confirmation.settlement_digest
    );
    Ok(())
}
