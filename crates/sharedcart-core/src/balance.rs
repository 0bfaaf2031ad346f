use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sharedcart_canonical::{BillId, Money, ParticipantId};
use tracing::debug;

use crate::errors::SettlementError;
use crate::model::{Bill, BillItem, OwnershipMode, Participant};

/// One member's position across a settlement run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Member.
    pub participant_id: ParticipantId,
    /// Member display name.
    pub name: String,
    /// Σ totals of bills this member paid.
    pub paid: Money,
    /// Σ shares allocated to this member.
    pub owed: Money,
    /// `paid − owed`; positive means the member is owed money.
    pub net: Money,
}

/// Output of balance aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSheet {
    /// One entry per member, ascending by participant id.
    pub balances: Vec<Balance>,
    /// Σ bill totals.
    pub total_amount: Money,
}

#[derive(Debug)]
struct Ledger<'a> {
    name: &'a str,
    paid: Money,
    owed: Money,
}

/// Computes paid/owed/net for every member across `bills`.
///
/// Shared items are split across all members, personal items across their
/// owners. When a cost does not divide evenly the leftover cents go one each
/// to the lowest participant ids in the owner set, so shares always sum to
/// the item cost.
pub fn aggregate_balances(
    members: &[Participant],
    bills: &[Bill],
) -> Result<BalanceSheet, SettlementError> {
    let mut ledgers = member_ledgers(members)?;
    let everyone: Vec<ParticipantId> = ledgers.keys().copied().collect();

    let mut seen_bills: BTreeSet<BillId> = BTreeSet::new();
    let mut total_amount = Money::ZERO;

    for bill in bills {
        if !seen_bills.insert(bill.id) {
            return Err(SettlementError::invalid_bill(bill.id, "bill appears more than once"));
        }
        let overflow = || SettlementError::invalid_bill(bill.id, "running totals overflow");

        let payer = ledgers.get_mut(&bill.payer).ok_or_else(|| {
            SettlementError::invalid_bill(
                bill.id,
                format!("payer {} is not a group member", bill.payer),
            )
        })?;
        let bill_total = bill.total()?;
        payer.paid = payer.paid.checked_add(bill_total).ok_or_else(overflow)?;
        total_amount = total_amount.checked_add(bill_total).ok_or_else(overflow)?;

        for item in &bill.items {
            let owners = owner_set(bill.id, item, &everyone, &ledgers)?;
            let cost = item.cost(bill.id)?;
            for (owner, share) in allocate(cost, &owners) {
                if let Some(ledger) = ledgers.get_mut(&owner) {
                    ledger.owed = ledger.owed.checked_add(share).ok_or_else(overflow)?;
                }
            }
        }
    }

    debug!(
        members = ledgers.len(),
        bills = bills.len(),
        items = bills.iter().map(|b| b.items.len()).sum::<usize>(),
        total = %total_amount,
        "aggregated balances"
    );

    let balances = ledgers
        .into_iter()
        .map(|(participant_id, ledger)| {
            // paid and owed each lie in 0..=i64::MAX, so the difference fits.
            let net = ledger.paid.minor_units() - ledger.owed.minor_units();
            Balance {
                participant_id,
                name: ledger.name.to_string(),
                paid: ledger.paid,
                owed: ledger.owed,
                net: Money::from_minor_units(net),
            }
        })
        .collect();

    Ok(BalanceSheet {
        balances,
        total_amount,
    })
}

fn member_ledgers(
    members: &[Participant],
) -> Result<BTreeMap<ParticipantId, Ledger<'_>>, SettlementError> {
    if members.is_empty() {
        return Err(SettlementError::InvalidGroup("group has no members".to_string()));
    }
    let mut ledgers = BTreeMap::new();
    for member in members {
        let fresh = Ledger {
            name: &member.name,
            paid: Money::ZERO,
            owed: Money::ZERO,
        };
        if ledgers.insert(member.id, fresh).is_some() {
            return Err(SettlementError::InvalidGroup(format!(
                "participant {} is listed more than once",
                member.id
            )));
        }
    }
    Ok(ledgers)
}

/// Owners of an item in ascending id order, de-duplicated.
fn owner_set(
    bill_id: BillId,
    item: &BillItem,
    everyone: &[ParticipantId],
    ledgers: &BTreeMap<ParticipantId, Ledger<'_>>,
) -> Result<Vec<ParticipantId>, SettlementError> {
    match item.ownership {
        OwnershipMode::Shared => Ok(everyone.to_vec()),
        OwnershipMode::Personal => {
            if item.owners.is_empty() {
                return Err(SettlementError::InvalidItemOwnership {
                    bill_id,
                    item: item.name.clone(),
                    reason: "personal item has no owners".to_string(),
                });
            }
            let owners: BTreeSet<ParticipantId> = item.owners.iter().copied().collect();
            if let Some(stranger) = owners.iter().find(|id| !ledgers.contains_key(*id)) {
                return Err(SettlementError::non_member_owner(bill_id, &item.name, *stranger));
            }
            Ok(owners.into_iter().collect())
        }
    }
}

/// Splits `cost` across `owners` (already in ascending id order).
///
/// The first `remainder` owners receive one extra minor unit each.
pub(crate) fn allocate(cost: Money, owners: &[ParticipantId]) -> Vec<(ParticipantId, Money)> {
    let Some((share, remainder)) = cost.split_even(owners.len()) else {
        return Vec::new();
    };
    owners
        .iter()
        .enumerate()
        .map(|(idx, owner)| {
            let extra = if idx < remainder {
                Money::MINOR_UNIT
            } else {
                Money::ZERO
            };
            // share + 1 cent never exceeds cost, so this cannot overflow.
            let amount = share.checked_add(extra).unwrap_or(share);
            (*owner, amount)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(s: &str) -> Money {
        Money::parse(s).unwrap()
    }

    fn pid(n: u64) -> ParticipantId {
        ParticipantId::new(n)
    }

    fn bid(n: u64) -> BillId {
        BillId::new(n)
    }

    fn trio() -> Vec<Participant> {
        vec![
            Participant::new(pid(3), "C"),
            Participant::new(pid(1), "A"),
            Participant::new(pid(2), "B"),
        ]
    }

    #[test]
    fn remainder_goes_to_lowest_ids() {
        let shares = allocate(m("10.00"), &[pid(1), pid(2), pid(3)]);
        assert_eq!(
            shares,
            vec![
                (pid(1), m("3.34")),
                (pid(2), m("3.33")),
                (pid(3), m("3.33")),
            ]
        );
    }

    #[test]
    fn allocation_with_more_owners_than_cents() {
        let shares = allocate(m("0.02"), &[pid(1), pid(2), pid(3)]);
        let amounts: Vec<Money> = shares.iter().map(|(_, a)| *a).collect();
        assert_eq!(amounts, vec![m("0.01"), m("0.01"), m("0.00")]);
    }

    #[test]
    fn shared_bill_is_split_across_all_members() {
        let items = vec![BillItem::shared("dinner", m("90.00"), 1)];
        let bills = vec![Bill::new(bid(1), pid(1), items)];
        let sheet = aggregate_balances(&trio(), &bills).unwrap();

        assert_eq!(sheet.total_amount, m("90.00"));
        let nets: Vec<(u64, Money)> = sheet
            .balances
            .iter()
            .map(|b| (b.participant_id.get(), b.net))
            .collect();
        assert_eq!(
            nets,
            vec![(1, m("60.00")), (2, m("-30.00")), (3, m("-30.00"))]
        );
        assert_eq!(sheet.balances[0].name, "A");
        assert_eq!(sheet.balances[0].paid, m("90.00"));
        assert_eq!(sheet.balances[0].owed, m("30.00"));
    }

    #[test]
    fn shared_items_ignore_explicit_owners() {
        let mut item = BillItem::shared("rent", m("9.00"), 1);
        item.owners = vec![pid(2)];
        let bills = vec![Bill::new(bid(1), pid(1), vec![item])];
        let sheet = aggregate_balances(&trio(), &bills).unwrap();
        assert!(sheet.balances.iter().all(|b| b.owed == m("3.00")));
    }

    #[test]
    fn personal_items_charge_only_owners() {
        let items = vec![
            BillItem::personal("wine", m("12.00"), 1, [pid(1), pid(3)]),
            BillItem::personal("socks", m("5.00"), 2, [pid(3), pid(3)]),
        ];
        let bills = vec![Bill::new(bid(7), pid(2), items)];
        let sheet = aggregate_balances(&trio(), &bills).unwrap();
        let owed: Vec<Money> = sheet.balances.iter().map(|b| b.owed).collect();
        assert_eq!(owed, vec![m("6.00"), m("0.00"), m("16.00")]);
        assert_eq!(sheet.balances[1].paid, m("22.00"));
    }

    #[test]
    fn members_without_activity_get_zero_rows() {
        let members = vec![Participant::new(pid(1), "A"), Participant::new(pid(9), "Z")];
        let items = vec![BillItem::personal("coffee", m("3.00"), 1, [pid(1)])];
        let bills = vec![Bill::new(bid(1), pid(1), items)];
        let sheet = aggregate_balances(&members, &bills).unwrap();
        assert_eq!(sheet.balances.len(), 2);
        assert_eq!(sheet.balances[1].paid, Money::ZERO);
        assert_eq!(sheet.balances[1].owed, Money::ZERO);
        assert_eq!(sheet.balances[1].net, Money::ZERO);
    }

    #[test]
    fn personal_item_without_owners_fails() {
        let items = vec![BillItem::personal("gift", m("3.00"), 1, Vec::new())];
        let bills = vec![Bill::new(bid(5), pid(1), items)];
        let err = aggregate_balances(&trio(), &bills).unwrap_err();
        assert!(matches!(err, SettlementError::InvalidItemOwnership { .. }));
    }

    #[test]
    fn personal_item_with_stranger_fails() {
        let items = vec![BillItem::personal("gift", m("3.00"), 1, [pid(1), pid(42)])];
        let bills = vec![Bill::new(bid(5), pid(1), items)];
        match aggregate_balances(&trio(), &bills).unwrap_err() {
            SettlementError::InvalidItemOwnership { reason, .. } => assert!(reason.contains("42")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn payer_outside_group_fails() {
        let items = vec![BillItem::shared("x", m("1.00"), 1)];
        let bills = vec![Bill::new(bid(5), pid(8), items)];
        assert!(matches!(
            aggregate_balances(&trio(), &bills),
            Err(SettlementError::InvalidBill { .. })
        ));
    }

    #[test]
    fn non_positive_amount_and_zero_quantity_fail() {
        let zero = BillItem::shared("x", Money::ZERO, 1);
        let negative = BillItem::shared("x", m("-1.00"), 1);
        let none = BillItem::shared("x", m("1.00"), 0);
        for item in [zero, negative, none] {
            let bills = vec![Bill::new(bid(1), pid(1), vec![item])];
            assert!(matches!(
                aggregate_balances(&trio(), &bills),
                Err(SettlementError::InvalidBill { .. })
            ));
        }
    }

    #[test]
    fn duplicate_members_and_bills_fail() {
        let members = vec![
            Participant::new(pid(1), "A"),
            Participant::new(pid(1), "A again"),
        ];
        assert!(matches!(
            aggregate_balances(&members, &[]),
            Err(SettlementError::InvalidGroup(_))
        ));
        assert!(matches!(
            aggregate_balances(&[], &[]),
            Err(SettlementError::InvalidGroup(_))
        ));

        let bill = Bill::new(bid(1), pid(1), vec![BillItem::shared("x", m("1.00"), 1)]);
        assert!(matches!(
            aggregate_balances(&trio(), &[bill.clone(), bill]),
            Err(SettlementError::InvalidBill { .. })
        ));
    }

    fn over_half() -> Money {
        Money::from_minor_units(i64::MAX / 2 + 1)
    }

    fn invalid_bill_reason(err: SettlementError) -> (BillId, String) {
        match err {
            SettlementError::InvalidBill { bill_id, reason } => (bill_id, reason),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn item_cost_overflow_is_an_invalid_bill() {
        let items = vec![BillItem::shared("x", over_half(), 2)];
        let bills = vec![Bill::new(bid(3), pid(1), items)];
        let err = aggregate_balances(&trio(), &bills).unwrap_err();
        let (bill_id, reason) = invalid_bill_reason(err);
        assert_eq!(bill_id, bid(3));
        assert!(reason.contains("cost overflows"), "{reason}");
    }

    #[test]
    fn running_total_overflow_is_an_invalid_bill() {
        let bills = vec![
            Bill::new(bid(1), pid(1), vec![BillItem::shared("x", over_half(), 1)]),
            Bill::new(bid(2), pid(2), vec![BillItem::shared("x", over_half(), 1)]),
        ];
        let err = aggregate_balances(&trio(), &bills).unwrap_err();
        let (bill_id, reason) = invalid_bill_reason(err);
        assert_eq!(bill_id, bid(2));
        assert!(reason.contains("running totals overflow"), "{reason}");
    }

    #[test]
    fn net_spans_full_range_without_overflow() {
        let max = Money::from_minor_units(i64::MAX);
        let items = vec![BillItem::personal("yacht", max, 1, [pid(2)])];
        let bills = vec![Bill::new(bid(1), pid(1), items)];
        let sheet = aggregate_balances(&trio(), &bills).unwrap();
        assert_eq!(sheet.balances[0].net, max);
        assert_eq!(sheet.balances[1].net.minor_units(), -i64::MAX);
        assert_eq!(sheet.balances[2].net, Money::ZERO);
    }
}
