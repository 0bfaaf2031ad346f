use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sharedcart_canonical::{BillId, Digest, GroupId};

use crate::errors::{ConfirmationError, CoreError};
use crate::minimize::Transaction;
use crate::request::SettlementRequest;
use crate::settlement::{compute_settlement, SettlementResult};

/// Request to confirm a calculated settlement.
///
/// Carries the exact bill set and transfers of the calculation plus its
/// digest, so the store can mark precisely those bills as settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettlementConfirmation {
    /// Group, when the calculation named one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Bills to mark settled.
    pub bill_ids: Vec<BillId>,
    /// Transfers agreed on.
    pub transactions: Vec<Transaction>,
    /// Digest of the calculation being confirmed.
    pub settlement_digest: Digest,
}

impl SettlementConfirmation {
    /// Builds the confirmation for a calculation.
    pub fn from_result(result: &SettlementResult) -> Result<Self, ConfirmationError> {
        if result.bill_ids.is_empty() {
            return Err(ConfirmationError::EmptyBillSet);
        }
        Ok(Self {
            group_id: result.group_id,
            bill_ids: result.bill_ids.clone(),
            transactions: result.transactions.clone(),
            settlement_digest: result.settlement_digest.clone(),
        })
    }
}

/// Checks that `confirmation` refers to exactly the calculation in `result`.
pub fn verify_confirmation(
    confirmation: &SettlementConfirmation,
    result: &SettlementResult,
) -> Result<(), ConfirmationError> {
    if confirmation.bill_ids.is_empty() {
        return Err(ConfirmationError::EmptyBillSet);
    }
    if confirmation.group_id != result.group_id {
        return Err(ConfirmationError::GroupMismatch);
    }

    let confirmed: BTreeSet<BillId> = confirmation.bill_ids.iter().copied().collect();
    let calculated: BTreeSet<BillId> = result.bill_ids.iter().copied().collect();
    if confirmed != calculated {
        return Err(ConfirmationError::BillSetMismatch {
            missing: calculated.difference(&confirmed).copied().collect(),
            unexpected: confirmed.difference(&calculated).copied().collect(),
        });
    }

    let recomputed = result
        .recompute_digest()
        .map_err(|e| ConfirmationError::Digest(e.to_string()))?;
    if recomputed != result.settlement_digest || recomputed != confirmation.settlement_digest {
        return Err(ConfirmationError::DigestMismatch);
    }

    if confirmation.transactions != result.transactions {
        return Err(ConfirmationError::TransactionsMismatch);
    }
    Ok(())
}

/// Recomputes the settlement for `request` and checks `confirmation` against it.
///
/// Returns the recomputed result when the confirmation matches.
pub fn confirm_request(
    request: &SettlementRequest,
    confirmation: &SettlementConfirmation,
) -> Result<SettlementResult, CoreError> {
    let result = compute_settlement(request)?;
    verify_confirmation(confirmation, &result)?;
    Ok(result)
}
