use serde::{Deserialize, Serialize};
use sharedcart_canonical::{
    compute_settlement_digest, BillId, Canonicalizer, Digest, DigestAlg, GroupId, Money,
    ParticipantId,
};
use tracing::debug;

use crate::balance::{aggregate_balances, Balance};
use crate::errors::SettlementError;
use crate::minimize::{minimize_transactions, Transaction};
use crate::model::{Bill, Participant};
use crate::request::SettlementRequest;

/// Balances and transfers for one settlement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Group, when the request named one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Bills the run was computed from, ascending.
    pub bill_ids: Vec<BillId>,
    /// Number of bills in the run.
    pub bill_count: usize,
    /// Σ bill totals.
    pub total_amount: Money,
    /// One entry per member, ascending by participant id.
    pub balances: Vec<Balance>,
    /// Transfers in emission order.
    pub transactions: Vec<Transaction>,
    /// Digest over every other field.
    pub settlement_digest: Digest,
}

/// Runs a settlement for a parsed request.
pub fn compute_settlement(
    request: &SettlementRequest,
) -> Result<SettlementResult, SettlementError> {
    settle(request.group_id, &request.members, &request.bills)
}

/// Runs a settlement over borrowed members and bills.
///
/// Either the full result is returned or nothing is; the inputs are never
/// modified.
pub fn compute_settlement_for(
    members: &[Participant],
    bills: &[Bill],
) -> Result<SettlementResult, SettlementError> {
    settle(None, members, bills)
}

fn settle(
    group_id: Option<GroupId>,
    members: &[Participant],
    bills: &[Bill],
) -> Result<SettlementResult, SettlementError> {
    debug!(
        members = members.len(),
        bills = bills.len(),
        "computing settlement"
    );

    let sheet = aggregate_balances(members, bills)?;
    let transactions = minimize_transactions(&sheet.balances)?;

    let mut bill_ids: Vec<BillId> = bills.iter().map(|b| b.id).collect();
    bill_ids.sort_unstable();

    let mut result = SettlementResult {
        group_id,
        bill_count: bill_ids.len(),
        bill_ids,
        total_amount: sheet.total_amount,
        balances: sheet.balances,
        transactions,
        settlement_digest: Digest {
            alg: DigestAlg::Sha256,
            b64: String::new(),
        },
    };
    result.settlement_digest = result.recompute_digest()?;
    Ok(result)
}

impl SettlementResult {
    /// Digest of this result's content, ignoring the stored digest.
    pub fn recompute_digest(&self) -> Result<Digest, SettlementError> {
        Ok(compute_settlement_digest(self, &Canonicalizer::settlement())?)
    }

    /// Balance row for a participant.
    pub fn balance_of(&self, participant: ParticipantId) -> Option<&Balance> {
        self.balances.iter().find(|b| b.participant_id == participant)
    }
}
