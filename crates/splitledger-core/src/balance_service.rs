//! Aggregates paid and owed totals for every member of a snapshot.

use std::collections::HashMap;

use tracing::{debug, warn};

use splitledger_domain::{
    BalanceSheet, DanglingPolicy, Expense, Member, MemberBalance, MemberId, Money,
};

/// Computes per-member balances from a member roster and a list of
/// equally-split expenses.
///
/// Amounts are split in whole cents: every participant owes
/// `amount / n` rounded down, and the leftover cents go to the participants
/// with the lowest member ids. The shares of one expense therefore always sum
/// to exactly its amount, and the result does not depend on expense order or
/// on the order of ids inside `split_between`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceCalculator {
    policy: DanglingPolicy,
}

impl BalanceCalculator {
    pub fn new(policy: DanglingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> DanglingPolicy {
        self.policy
    }

    /// Builds a balance entry for every member and folds each expense into it.
    ///
    /// Expenses with an empty split are skipped. Expenses that reference
    /// members outside `members` are handled according to the configured
    /// [`DanglingPolicy`]. Inputs are never mutated.
    pub fn compute(&self, members: &[Member], expenses: &[Expense]) -> BalanceSheet {
        let mut entries: Vec<MemberBalance> = members
            .iter()
            .map(|member| MemberBalance::new(member.id, member.name.clone(), member.avatar_label()))
            .collect();

        let mut index: HashMap<MemberId, usize> = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            index.entry(member.id).or_insert(position);
        }

        let mut skipped = 0usize;
        let mut excluded = 0usize;

        for expense in expenses {
            let shares = participant_shares(expense);
            if shares.is_empty() {
                skipped += 1;
                continue;
            }

            let payer = index.get(&expense.paid_by).copied();
            let unknown: Vec<MemberId> = shares
                .iter()
                .map(|(member_id, _)| *member_id)
                .filter(|member_id| !index.contains_key(member_id))
                .collect();

            if self.policy == DanglingPolicy::Exclude && (payer.is_none() || !unknown.is_empty()) {
                warn!(
                    expense = %expense.id,
                    payer = %expense.paid_by,
                    unknown = ?unknown,
                    "excluding expense that references unknown members"
                );
                excluded += 1;
                continue;
            }

            if payer.is_none() {
                warn!(
                    expense = %expense.id,
                    payer = %expense.paid_by,
                    "dropping contribution of unknown payer"
                );
            }
            for member_id in &unknown {
                warn!(
                    expense = %expense.id,
                    member = %member_id,
                    "dropping share of unknown participant"
                );
            }

            let Some((paid, owes)) = checked_totals(&entries, &index, payer, expense.amount, &shares)
            else {
                warn!(
                    expense = %expense.id,
                    amount = %expense.amount,
                    "excluding expense that overflows member totals"
                );
                excluded += 1;
                continue;
            };
            if let Some((position, total)) = paid {
                entries[position].paid = total;
            }
            for (position, total) in owes {
                entries[position].owes = total;
            }
        }

        debug!(
            members = entries.len(),
            expenses = expenses.len(),
            skipped,
            excluded,
            "computed member balances"
        );
        BalanceSheet::new(entries)
    }
}

/// New paid and owed totals for the members touched by one expense, or
/// `None` when any of them would leave the `i64` range. Nothing is written
/// until every total is known to fit.
fn checked_totals(
    entries: &[MemberBalance],
    index: &HashMap<MemberId, usize>,
    payer: Option<usize>,
    amount: Money,
    shares: &[(MemberId, Money)],
) -> Option<(Option<(usize, Money)>, Vec<(usize, Money)>)> {
    let paid = match payer {
        Some(position) => Some((position, entries[position].paid.checked_add(amount)?)),
        None => None,
    };
    let mut owes = Vec::with_capacity(shares.len());
    for (member_id, share) in shares {
        if let Some(&position) = index.get(member_id) {
            let total = entries[position].owes.checked_add(*share)?;
            let net = paid
                .filter(|(payer_position, _)| *payer_position == position)
                .map_or(entries[position].paid, |(_, paid)| paid);
            net.checked_sub(total)?;
            owes.push((position, total));
        }
    }
    if let Some((position, total)) = paid {
        total.checked_sub(entries[position].owes)?;
    }
    Some((paid, owes))
}

/// Computes balances with the default (excluding) dangling-reference policy.
pub fn compute_balances(members: &[Member], expenses: &[Expense]) -> BalanceSheet {
    BalanceCalculator::default().compute(members, expenses)
}

/// Each distinct participant of `expense` paired with the share they owe.
/// Empty when nobody splits the expense.
pub fn participant_shares(expense: &Expense) -> Vec<(MemberId, Money)> {
    let participants = expense.participants();
    let shares = expense.amount.split_evenly(participants.len());
    participants.into_iter().zip(shares).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitledger_domain::ExpenseId;

    fn roster(names: &[&str]) -> Vec<Member> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| Member::new(MemberId(idx as i64 + 1), *name))
            .collect()
    }

    fn expense(id: i64, major: i64, paid_by: i64, split: &[i64]) -> Expense {
        Expense::new(
            ExpenseId(id),
            Money::from_major(major),
            MemberId(paid_by),
            split.iter().map(|id| MemberId(*id)),
        )
    }

    fn balance_of(sheet: &BalanceSheet, id: i64) -> &MemberBalance {
        sheet.get(MemberId(id)).expect("member present")
    }

    #[test]
    fn single_expense_split_three_ways() {
        let members = roster(&["A", "B", "C"]);
        let sheet = compute_balances(&members, &[expense(1, 90, 1, &[1, 2, 3])]);

        let a = balance_of(&sheet, 1);
        assert_eq!(a.paid, Money::from_major(90));
        assert_eq!(a.owes, Money::from_major(30));
        assert_eq!(a.balance(), Money::from_major(60));
        for id in [2, 3] {
            let entry = balance_of(&sheet, id);
            assert_eq!(entry.paid, Money::ZERO);
            assert_eq!(entry.owes, Money::from_major(30));
            assert_eq!(entry.balance(), Money::from_major(-30));
        }
    }

    #[test]
    fn two_expenses_between_two_members() {
        let members = roster(&["A", "B"]);
        let expenses = [expense(1, 100, 1, &[1, 2]), expense(2, 50, 2, &[1, 2])];
        let sheet = compute_balances(&members, &expenses);

        let a = balance_of(&sheet, 1);
        assert_eq!(a.paid, Money::from_major(100));
        assert_eq!(a.owes, Money::from_major(75));
        assert_eq!(a.balance(), Money::from_major(25));
        let b = balance_of(&sheet, 2);
        assert_eq!(b.paid, Money::from_major(50));
        assert_eq!(b.owes, Money::from_major(75));
        assert_eq!(b.balance(), Money::from_major(-25));
    }

    #[test]
    fn empty_split_is_skipped() {
        let members = roster(&["A", "B"]);
        let sheet = compute_balances(&members, &[expense(1, 40, 1, &[])]);

        for entry in &sheet {
            assert_eq!(entry.paid, Money::ZERO);
            assert_eq!(entry.owes, Money::ZERO);
        }
    }

    #[test]
    fn duplicate_participants_count_once() {
        let members = roster(&["A", "B"]);
        let sheet = compute_balances(&members, &[expense(1, 10, 1, &[2, 2, 1, 2])]);

        assert_eq!(balance_of(&sheet, 1).owes, Money::from_major(5));
        assert_eq!(balance_of(&sheet, 2).owes, Money::from_major(5));
    }

    #[test]
    fn leftover_cents_go_to_lowest_ids() {
        let members = roster(&["A", "B", "C"]);
        let odd = Expense::new(
            ExpenseId(1),
            Money::from_cents(100),
            MemberId(3),
            [MemberId(3), MemberId(2), MemberId(1)],
        );
        let sheet = compute_balances(&members, &[odd]);

        assert_eq!(balance_of(&sheet, 1).owes, Money::from_cents(34));
        assert_eq!(balance_of(&sheet, 2).owes, Money::from_cents(33));
        assert_eq!(balance_of(&sheet, 3).owes, Money::from_cents(33));
        assert_eq!(sheet.net_total(), Money::ZERO);
    }

    #[test]
    fn uninvolved_members_stay_at_zero() {
        let members = roster(&["A", "B", "C"]);
        let sheet = compute_balances(&members, &[expense(1, 20, 1, &[1, 2])]);

        let c = balance_of(&sheet, 3);
        assert_eq!(c.paid, Money::ZERO);
        assert_eq!(c.owes, Money::ZERO);
        assert_eq!(c.balance(), Money::ZERO);
    }

    #[test]
    fn empty_roster_yields_empty_sheet() {
        let sheet = compute_balances(&[], &[expense(1, 20, 1, &[1, 2])]);
        assert!(sheet.is_empty());
    }

    #[test]
    fn exclude_policy_drops_whole_expense_with_unknown_members() {
        let members = roster(&["A", "B"]);
        let expenses = [expense(1, 30, 1, &[1, 2, 9]), expense(2, 20, 9, &[1, 2])];
        let sheet = compute_balances(&members, &expenses);

        assert_eq!(sheet.total_paid(), Money::ZERO);
        assert_eq!(sheet.total_owes(), Money::ZERO);
        assert_eq!(sheet.net_total(), Money::ZERO);
    }

    #[test]
    fn lenient_policy_drops_only_unknown_contributions() {
        let members = roster(&["A", "B"]);
        let expenses = [expense(1, 30, 1, &[1, 2, 9]), expense(2, 20, 9, &[1, 2])];
        let sheet = BalanceCalculator::new(DanglingPolicy::Lenient).compute(&members, &expenses);

        let a = balance_of(&sheet, 1);
        assert_eq!(a.paid, Money::from_major(30));
        assert_eq!(a.owes, Money::from_major(20));
        let b = balance_of(&sheet, 2);
        assert_eq!(b.owes, Money::from_major(20));
        assert_ne!(sheet.net_total(), Money::ZERO);
    }

    #[test]
    fn expenses_that_overflow_totals_are_excluded() {
        let members = roster(&["A", "B"]);
        let huge = Money::from_cents(i64::MAX / 2 + 1);
        let expenses = [
            Expense::new(ExpenseId(1), huge, MemberId(1), [MemberId(1)]),
            Expense::new(ExpenseId(2), huge, MemberId(1), [MemberId(1)]),
            expense(3, 10, 2, &[1, 2]),
        ];
        let sheet = compute_balances(&members, &expenses);

        let a = balance_of(&sheet, 1);
        assert_eq!(a.paid, huge);
        assert_eq!(a.owes, huge + Money::from_major(5));
        assert_eq!(sheet.net_total(), Money::ZERO);
    }

    #[test]
    fn result_is_independent_of_expense_order() {
        let members = roster(&["A", "B", "C"]);
        let mut expenses = vec![
            expense(1, 17, 1, &[1, 2, 3]),
            expense(2, 5, 2, &[3, 1]),
            expense(3, 11, 3, &[2]),
        ];
        let forward = compute_balances(&members, &expenses);
        expenses.reverse();
        let backward = compute_balances(&members, &expenses);

        assert_eq!(forward, backward);
    }
}
