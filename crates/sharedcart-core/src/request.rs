use serde::{Deserialize, Serialize};
use sharedcart_canonical::GroupId;

use crate::errors::CoreError;
use crate::model::{Bill, Participant};

/// Everything one settlement run needs, as supplied by the bill/group store.
///
/// Unknown fields are rejected at every level so payloads that drift from
/// this contract fail before any calculation happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettlementRequest {
    /// Group the bills belong to, echoed into the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Full group membership.
    pub members: Vec<Participant>,
    /// Fully hydrated bills selected for this run.
    pub bills: Vec<Bill>,
}

impl SettlementRequest {
    /// Parses a request document.
    pub fn from_json(input: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(input)?)
    }
}
