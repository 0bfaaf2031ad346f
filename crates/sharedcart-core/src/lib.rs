//! Settlement engine for shared-expense groups.
//!
//! This crate provides:
//! - Bill and item model types with shared/personal ownership
//! - Balance aggregation across an arbitrary subset of bills
//! - Greedy debt simplification into creditor/debtor transfers
//! - Settlement confirmations bound to the exact calculated bill set
//!
//! Core invariants:
//! - All arithmetic is exact fixed-point; no currency unit is created or destroyed
//! - Σ net over all members is zero for any valid input
//! - Output order is fully deterministic (ties break on ascending participant id)
//! - The engine holds no state between calls; every call is side-effect free
//!
//! ## Quick Start
//!
//! ```rust
//! use sharedcart_core::{compute_settlement, SettlementRequest};
//!
//! let request: SettlementRequest = serde_json::from_str(r#"{
//!     "members": [
//!         {"id": 1, "name": "A"}, {"id": 2, "name": "B"}, {"id": 3, "name": "C"}
//!     ],
//!     "bills": [{
//!         "id": 10,
//!         "payer": 1,
//!         "items": [{"name": "groceries", "amount": "90.00", "ownership": "shared"}]
//!     }]
//! }"#)?;
//!
//! let result = compute_settlement(&request)?;
//! assert_eq!(result.transactions.len(), 2);
//! assert_eq!(result.transactions[0].amount.to_string(), "30.00");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
#![deny(missing_docs)]

/// Per-member paid/owed/net aggregation.
pub mod balance;
/// Confirmation of a calculated settlement.
pub mod confirmation;
/// Error types for engine operations.
pub mod errors;
/// Debt simplification into transfers.
pub mod minimize;
/// Participants, bills, and items.
pub mod model;
/// Typed request contract at the engine boundary.
pub mod request;
/// Result assembly and the `compute_settlement` entry point.
pub mod settlement;

pub use balance::{aggregate_balances, Balance, BalanceSheet};
pub use confirmation::{confirm_request, verify_confirmation, SettlementConfirmation};
pub use errors::{ConfirmationError, CoreError, SettlementError};
pub use minimize::{minimize_transactions, Transaction};
pub use model::{Bill, BillItem, OwnershipMode, Participant};
pub use request::SettlementRequest;
pub use settlement::{compute_settlement, compute_settlement_for, SettlementResult};
