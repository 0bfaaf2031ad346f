use serde::{Deserialize, Serialize};
use sharedcart_canonical::{BillId, Money, ParticipantId};

use crate::errors::SettlementError;

/// Group member taking part in a settlement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Participant {
    /// Identifier, unique within the group.
    pub id: ParticipantId,
    /// Display name carried through to balances and transactions.
    pub name: String,
}

impl Participant {
    /// Convenience constructor.
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// How an item's cost is attributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipMode {
    /// Split evenly across every group member; explicit owners are ignored.
    Shared,
    /// Split evenly across the item's explicit owners only.
    Personal,
}

fn default_quantity() -> u32 {
    1
}

/// Line item on a bill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BillItem {
    /// Item label.
    pub name: String,
    /// Unit price.
    pub amount: Money,
    /// Number of units (defaults to 1).
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Ownership mode.
    pub ownership: OwnershipMode,
    /// Explicit owners; only consulted for [`OwnershipMode::Personal`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<ParticipantId>,
}

impl BillItem {
    /// Item split across the whole group.
    pub fn shared(name: impl Into<String>, amount: Money, quantity: u32) -> Self {
        Self {
            name: name.into(),
            amount,
            quantity,
            ownership: OwnershipMode::Shared,
            owners: Vec::new(),
        }
    }

    /// Item split across the given owners.
    pub fn personal(
        name: impl Into<String>,
        amount: Money,
        quantity: u32,
        owners: impl IntoIterator<Item = ParticipantId>,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            quantity,
            ownership: OwnershipMode::Personal,
            owners: owners.into_iter().collect(),
        }
    }

    /// `amount × quantity`, validated.
    pub fn cost(&self, bill_id: BillId) -> Result<Money, SettlementError> {
        if !self.amount.is_positive() {
            return Err(SettlementError::invalid_bill(
                bill_id,
                format!(
                    "item '{}' has non-positive amount {}",
                    self.name, self.amount
                ),
            ));
        }
        if self.quantity == 0 {
            return Err(SettlementError::invalid_bill(
                bill_id,
                format!("item '{}' has zero quantity", self.name),
            ));
        }
        self.amount.checked_mul(self.quantity).ok_or_else(|| {
            SettlementError::invalid_bill(bill_id, format!("item '{}' cost overflows", self.name))
        })
    }
}

/// A bill paid in full by one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bill {
    /// Store identifier.
    pub id: BillId,
    /// Optional human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Member who paid the bill.
    pub payer: ParticipantId,
    /// Line items, in receipt order.
    pub items: Vec<BillItem>,
    /// Total as recorded by the store; checked against the item sum when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Money>,
}

impl Bill {
    /// Bill without a recorded total.
    pub fn new(id: BillId, payer: ParticipantId, items: Vec<BillItem>) -> Self {
        Self {
            id,
            title: None,
            payer,
            items,
            total_amount: None,
        }
    }

    /// Σ(amount × quantity) over the items.
    ///
    /// Fails when the bill has no items, an item is invalid, the sum
    /// overflows, or the recorded total disagrees with the item sum.
    pub fn total(&self) -> Result<Money, SettlementError> {
        if self.items.is_empty() {
            return Err(SettlementError::invalid_bill(self.id, "bill has no items"));
        }
        let mut total = Money::ZERO;
        for item in &self.items {
            let cost = item.cost(self.id)?;
            total = total
                .checked_add(cost)
                .ok_or_else(|| SettlementError::invalid_bill(self.id, "bill total overflows"))?;
        }
        if let Some(recorded) = self.total_amount {
            if recorded != total {
                return Err(SettlementError::invalid_bill(
                    self.id,
                    format!(
                        "recorded total {} does not match item sum {}",
                        recorded, total
                    ),
                ));
            }
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    #[test]
    fn total_multiplies_quantity_exactly() {
        let bill = Bill::new(
            BillId::new(1),
            ParticipantId::new(1),
            vec![
                BillItem::shared("milk", m("0.10"), 3),
                BillItem::shared("bread", m("0.20"), 1),
            ],
        );
        assert_eq!(bill.total().unwrap(), m("0.50"));
    }

    #[test]
    fn recorded_total_must_match() {
        let items = vec![BillItem::shared("tea", m("2.00"), 2)];
        let mut bill = Bill::new(BillId::new(4), ParticipantId::new(1), items);
        bill.total_amount = Some(m("4.00"));
        assert!(bill.total().is_ok());
        bill.total_amount = Some(m("4.01"));
        assert!(matches!(bill.total(), Err(SettlementError::InvalidBill { .. })));
    }

    #[test]
    fn bill_total_overflow_is_rejected() {
        let half = Money::from_minor_units(i64::MAX / 2 + 1);
        let items = vec![
            BillItem::shared("a", half, 1),
            BillItem::shared("b", half, 1),
        ];
        let bill = Bill::new(BillId::new(6), ParticipantId::new(1), items);
        match bill.total() {
            Err(SettlementError::InvalidBill { bill_id, reason }) => {
                assert_eq!(bill_id, BillId::new(6));
                assert_eq!(reason, "bill total overflows");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let doubled = BillItem::shared("c", half, 2);
        assert!(matches!(
            doubled.cost(BillId::new(6)),
            Err(SettlementError::InvalidBill { .. })
        ));
    }

    #[test]
    fn item_json_defaults_quantity_and_owners() {
        let raw = r#"{"name": "soap", "amount": "1.25", "ownership": "shared"}"#;
        let item: BillItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.quantity, 1);
        assert!(item.owners.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = serde_json::from_str::<BillItem>(
            r#"{"name": "soap", "amount": "1.25", "ownership": "shared", "is_shared": true}"#,
        );
        assert!(err.is_err());
    }
}
