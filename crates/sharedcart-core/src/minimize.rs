//! Debt simplification.
//!
//! Greedy min-cash-flow: repeatedly settle the largest outstanding debt
//! against the largest outstanding credit. Each step zeroes at least one
//! party, so `N` non-zero balances yield at most `N − 1` transfers.
//! Selection is backed by two binary heaps, giving `O(N log N)` overall.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use sharedcart_canonical::{Money, ParticipantId};
use tracing::{debug, trace};

use crate::balance::Balance;
use crate::errors::SettlementError;

/// A transfer from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Debtor.
    pub from: ParticipantId,
    /// Debtor display name.
    pub from_name: String,
    /// Creditor.
    pub to: ParticipantId,
    /// Creditor display name.
    pub to_name: String,
    /// Always positive.
    pub amount: Money,
}

/// Party with an outstanding magnitude, ordered so the heap top is the
/// largest magnitude and, among equals, the lowest participant id.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Outstanding<'a> {
    remaining: Money,
    id: ParticipantId,
    name: &'a str,
}

impl Ord for Outstanding<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.remaining
            .cmp(&other.remaining)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for Outstanding<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reduces net balances to a short list of transfers.
///
/// Fails with [`SettlementError::UnbalancedInput`] when Σ net differs from
/// zero by more than one minor unit per participant. A residual within that
/// tolerance is left unsettled on whichever side outlasts the other.
pub fn minimize_transactions(balances: &[Balance]) -> Result<Vec<Transaction>, SettlementError> {
    let residual: i128 = balances
        .iter()
        .map(|b| i128::from(b.net.minor_units()))
        .sum();
    let tolerance = i128::try_from(balances.len()).unwrap_or(i128::MAX);
    if residual.abs() > tolerance {
        return Err(SettlementError::UnbalancedInput {
            residual: clamp_money(residual),
            tolerance: clamp_money(tolerance),
        });
    }

    let mut creditors = BinaryHeap::new();
    let mut debtors = BinaryHeap::new();
    for balance in balances {
        let party = Outstanding {
            remaining: balance.net.abs(),
            id: balance.participant_id,
            name: &balance.name,
        };
        if balance.net.is_positive() {
            creditors.push(party);
        } else if balance.net.is_negative() {
            debtors.push(party);
        }
    }

    let mut transactions = Vec::with_capacity(creditors.len() + debtors.len());
    while !debtors.is_empty() && !creditors.is_empty() {
        let (Some(mut debtor), Some(mut creditor)) = (debtors.pop(), creditors.pop()) else {
            break;
        };
        let amount = debtor.remaining.min(creditor.remaining);
        trace!(from = %debtor.id, to = %creditor.id, amount = %amount, "transfer");
        transactions.push(Transaction {
            from: debtor.id,
            from_name: debtor.name.to_string(),
            to: creditor.id,
            to_name: creditor.name.to_string(),
            amount,
        });

        // amount <= both magnitudes, so neither subtraction can go negative.
        let reduce = |outstanding: Money| outstanding.checked_sub(amount).unwrap_or(Money::ZERO);
        debtor.remaining = reduce(debtor.remaining);
        creditor.remaining = reduce(creditor.remaining);
        if debtor.remaining.is_positive() {
            debtors.push(debtor);
        }
        if creditor.remaining.is_positive() {
            creditors.push(creditor);
        }
    }

    if residual != 0 {
        debug!(
            residual = %clamp_money(residual),
            unsettled_creditors = creditors.len(),
            unsettled_debtors = debtors.len(),
            "absorbed rounding residual"
        );
    }

    Ok(transactions)
}

fn clamp_money(units: i128) -> Money {
    let clamped = units.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
    Money::from_minor_units(clamped as i64)
}
