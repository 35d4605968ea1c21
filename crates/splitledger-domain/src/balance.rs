//! Derived balance and transfer views. Recomputed on every calculation,
//! never persisted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{member::MemberId, money::Money};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Per-member totals for one calculation.
pub struct MemberBalance {
    pub member_id: MemberId,
    pub name: String,
    pub avatar: String,
    pub paid: Money,
    pub owes: Money,
}

impl MemberBalance {
    pub fn new(member_id: MemberId, name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            member_id,
            name: name.into(),
            avatar: avatar.into(),
            paid: Money::ZERO,
            owes: Money::ZERO,
        }
    }

    /// Net position: positive when the member is owed money.
    pub fn balance(&self) -> Money {
        self.paid - self.owes
    }
}

/// Balances for every member of a snapshot, in roster order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceSheet {
    entries: Vec<MemberBalance>,
}

impl BalanceSheet {
    pub fn new(entries: Vec<MemberBalance>) -> Self {
        Self { entries }
    }

    pub fn get(&self, member_id: MemberId) -> Option<&MemberBalance> {
        self.entries.iter().find(|entry| entry.member_id == member_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberBalance> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[MemberBalance] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_paid(&self) -> Money {
        self.entries.iter().map(|entry| entry.paid).sum()
    }

    pub fn total_owes(&self) -> Money {
        self.entries.iter().map(|entry| entry.owes).sum()
    }

    /// Sum of all net balances; zero whenever no contribution was dropped.
    pub fn net_total(&self) -> Money {
        self.entries.iter().map(MemberBalance::balance).sum()
    }

    /// Net balances after applying `transfers` in order.
    pub fn residuals_after(&self, transfers: &[Transfer]) -> BTreeMap<MemberId, Money> {
        let mut residuals: BTreeMap<MemberId, Money> = self
            .entries
            .iter()
            .map(|entry| (entry.member_id, entry.balance()))
            .collect();
        for transfer in transfers {
            if let Some(balance) = residuals.get_mut(&transfer.from_id) {
                *balance += transfer.amount;
            }
            if let Some(balance) = residuals.get_mut(&transfer.to_id) {
                *balance -= transfer.amount;
            }
        }
        residuals
    }
}

impl<'a> IntoIterator for &'a BalanceSheet {
    type Item = &'a MemberBalance;
    type IntoIter = std::slice::Iter<'a, MemberBalance>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A single debtor-to-creditor payment proposed by the planner.
pub struct Transfer {
    pub from_id: MemberId,
    pub from_name: String,
    pub to_id: MemberId,
    pub to_name: String,
    pub amount: Money,
}
