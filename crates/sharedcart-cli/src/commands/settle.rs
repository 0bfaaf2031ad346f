//! Settle command implementation.

use crate::input;
use crate::output;
use sharedcart_core::compute_settlement;

pub fn run(
    request: Option<String>,
    json: bool,
    max_bills: Option<usize>,
    max_size: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = input::load_request(request.as_deref(), max_size)?;
    input::check_bill_limit(&request, max_bills)?;

    let result = compute_settlement(&request)?;
    tracing::info!(
        bills = result.bill_count,
        transactions = result.transactions.len(),
        total = %result.total_amount,
        "settlement computed"
    );

    if json {
        println!("{}", output::format_json(&result));
    } else {
        output::print_settlement(&result);
    }
    Ok(())
}
