//! Output formatting utilities.

use sharedcart_core::{Balance, SettlementResult, Transaction};

/// Formats any serializable value as pretty JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a balance as a table row.
pub fn format_balance_row(balance: &Balance) -> String {
    format!(
        "{:<10} {:<20} {:>14} {:>14} {:>14}",
        balance.participant_id,
        truncate(&balance.name, 20),
        balance.paid,
        balance.owed,
        balance.net
    )
}

/// Formats a transaction as a table row.
pub fn format_transaction_row(tx: &Transaction) -> String {
    format!(
        "{:<24} {:<24} {:>14}",
        truncate(&format!("{} ({})", tx.from_name, tx.from), 24),
        truncate(&format!("{} ({})", tx.to_name, tx.to), 24),
        tx.amount
    )
}

/// Prints a full settlement as human-readable tables.
#[allow(clippy::print_literal)]
pub fn print_settlement(result: &SettlementResult) {
    if let Some(group) = result.group_id {
        println!("GROUP {}", group);
    }
    println!(
        "BILLS {}  TOTAL {}  DIGEST {}",
        result.bill_count, result.total_amount, result.settlement_digest
    );
    println!();
    println!(
        "{:<10} {:<20} {:>14} {:>14} {:>14}",
        "MEMBER", "NAME", "PAID", "OWED", "NET"
    );
    println!("{}", "-".repeat(76));
    for balance in &result.balances {
        println!("{}", format_balance_row(balance));
    }
    println!();
    if result.transactions.is_empty() {
        println!("All settled; no transfers needed.");
        return;
    }
    println!("{:<24} {:<24} {:>14}", "FROM", "TO", "AMOUNT");
    println!("{}", "-".repeat(64));
    for tx in &result.transactions {
        println!("{}", format_transaction_row(tx));
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
