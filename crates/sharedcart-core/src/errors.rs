use sharedcart_canonical::{BillId, Money, ParticipantId, SettlementDigestError};
use thiserror::Error;

/// Validation failures raised by a settlement run.
///
/// All variants are deterministic: the same input always yields the same error.
#[derive(Error, Debug)]
pub enum SettlementError {
    /// Member list is empty or repeats an identifier.
    #[error("invalid group: {0}")]
    InvalidGroup(String),
    /// Bad payer, amount, quantity, recorded total, or duplicate bill.
    #[error("invalid bill {bill_id}: {reason}")]
    InvalidBill {
        /// Offending bill.
        bill_id: BillId,
        /// What was wrong.
        reason: String,
    },
    /// Personal item without owners or with a non-member owner.
    #[error("invalid ownership of item '{item}' on bill {bill_id}: {reason}")]
    InvalidItemOwnership {
        /// Bill carrying the item.
        bill_id: BillId,
        /// Item name.
        item: String,
        /// What was wrong.
        reason: String,
    },
    /// Net balances do not cancel within the rounding tolerance.
    #[error("balances do not cancel: residual {residual} exceeds tolerance {tolerance}")]
    UnbalancedInput {
        /// Σ net over all participants.
        residual: Money,
        /// One minor unit per participant.
        tolerance: Money,
    },
    /// The result could not be digested.
    #[error("settlement digest failed: {0}")]
    Digest(#[from] SettlementDigestError),
}

impl SettlementError {
    pub(crate) fn invalid_bill(bill_id: BillId, reason: impl Into<String>) -> Self {
        SettlementError::InvalidBill {
            bill_id,
            reason: reason.into(),
        }
    }

    pub(crate) fn non_member_owner(bill_id: BillId, item: &str, owner: ParticipantId) -> Self {
        SettlementError::InvalidItemOwnership {
            bill_id,
            item: item.to_string(),
            reason: format!("owner {} is not a group member", owner),
        }
    }
}

/// Reasons a confirmation does not match its calculation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfirmationError {
    /// A confirmation must name at least one bill.
    #[error("confirmation references no bills")]
    EmptyBillSet,
    /// Confirmed bills differ from the calculated bills.
    #[error("bill set mismatch: missing {missing:?}, unexpected {unexpected:?}")]
    BillSetMismatch {
        /// Calculated but not confirmed.
        missing: Vec<BillId>,
        /// Confirmed but not calculated.
        unexpected: Vec<BillId>,
    },
    /// Confirmation is for another group.
    #[error("confirmation group does not match the calculation")]
    GroupMismatch,
    /// Digest does not match the recomputed settlement.
    #[error("settlement digest mismatch")]
    DigestMismatch,
    /// Transfers differ from the calculated ones.
    #[error("confirmed transactions differ from the calculation")]
    TransactionsMismatch,
    /// Digest recomputation failed.
    #[error("digest recomputation failed: {0}")]
    Digest(String),
}

/// Top-level error for callers driving the engine from raw JSON.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input is not a structurally valid request.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] serde_json::Error),
    /// Settlement run failed.
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    /// Confirmation check failed.
    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),
}
