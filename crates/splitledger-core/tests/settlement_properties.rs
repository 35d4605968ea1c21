use proptest::prelude::*;
use splitledger_core::{compute_balances, plan_settlements, DEFAULT_TOLERANCE};
use splitledger_domain::{Expense, ExpenseId, Member, MemberId, Money};

fn build(
    member_count: usize,
    amounts: &[i64],
    payers: &[usize],
    splits: &[Vec<usize>],
) -> (Vec<Member>, Vec<Expense>) {
    let members: Vec<Member> = (0..member_count)
        .map(|idx| Member::new(MemberId(idx as i64 + 1), format!("m{idx}")))
        .collect();
    let expenses = amounts
        .iter()
        .enumerate()
        .map(|(idx, cents)| {
            let payer = payers.get(idx).copied().unwrap_or(0) % member_count;
            let split = splits
                .get(idx)
                .map(|ids| {
                    ids.iter()
                        .map(|id| MemberId((id % member_count) as i64 + 1))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            Expense::new(
                ExpenseId(idx as i64 + 1),
                Money::from_cents(*cents),
                MemberId(payer as i64 + 1),
                split,
            )
        })
        .collect();
    (members, expenses)
}

proptest! {
    #[test]
    fn paid_equals_owed_and_balances_sum_to_zero(
        member_count in 1usize..=6,
        amounts in prop::collection::vec(1i64..=100_000, 0..=25),
        payers in prop::collection::vec(0usize..=5, 0..=25),
        splits in prop::collection::vec(prop::collection::vec(0usize..=5, 1..=6), 0..=25),
    ) {
        let (members, expenses) = build(member_count, &amounts, &payers, &splits);
        let sheet = compute_balances(&members, &expenses);

        prop_assert_eq!(sheet.total_paid(), sheet.total_owes());
        prop_assert_eq!(sheet.net_total(), Money::ZERO);
    }

    #[test]
    fn transfers_leave_only_tolerance_sized_residuals(
        member_count in 1usize..=6,
        amounts in prop::collection::vec(1i64..=100_000, 0..=25),
        payers in prop::collection::vec(0usize..=5, 0..=25),
        splits in prop::collection::vec(prop::collection::vec(0usize..=5, 1..=6), 0..=25),
    ) {
        let (members, expenses) = build(member_count, &amounts, &payers, &splits);
        let sheet = compute_balances(&members, &expenses);
        let transfers = plan_settlements(&sheet);

        // Each member is left at most one tolerance from zero per other
        // member that was within the tolerance, plus two skipped pairings.
        let bound = Money::from_cents(DEFAULT_TOLERANCE.cents() * (member_count as i64 + 1));
        let residuals = sheet.residuals_after(&transfers);
        for (member, residual) in &residuals {
            prop_assert!(residual.abs() <= bound, "member {} left with {}", member, residual);
        }
        prop_assert_eq!(residuals.values().sum::<Money>(), Money::ZERO);
        for transfer in &transfers {
            prop_assert!(transfer.amount.is_positive());
            prop_assert_ne!(transfer.from_id, transfer.to_id);
        }
    }

    #[test]
    fn transfer_count_stays_below_party_count(
        member_count in 1usize..=6,
        amounts in prop::collection::vec(1i64..=100_000, 0..=25),
        payers in prop::collection::vec(0usize..=5, 0..=25),
        splits in prop::collection::vec(prop::collection::vec(0usize..=5, 1..=6), 0..=25),
    ) {
        let (members, expenses) = build(member_count, &amounts, &payers, &splits);
        let sheet = compute_balances(&members, &expenses);
        let transfers = plan_settlements(&sheet);

        let parties = sheet.iter().filter(|entry| !entry.balance().is_zero()).count();
        if parties == 0 {
            prop_assert!(transfers.is_empty());
        } else {
            prop_assert!(transfers.len() < parties);
        }
    }

    #[test]
    fn computation_is_idempotent(
        member_count in 1usize..=6,
        amounts in prop::collection::vec(1i64..=100_000, 0..=25),
        payers in prop::collection::vec(0usize..=5, 0..=25),
        splits in prop::collection::vec(prop::collection::vec(0usize..=5, 0..=6), 0..=25),
    ) {
        let (members, expenses) = build(member_count, &amounts, &payers, &splits);
        let first = compute_balances(&members, &expenses);
        let second = compute_balances(&members, &expenses);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(plan_settlements(&first), plan_settlements(&second));
    }
}

#[test]
fn whole_cent_balances_above_tolerance_settle_exactly() {
    let (members, expenses) = build(3, &[9_000, 1_500], &[0, 1], &[vec![0, 1, 2], vec![0, 1]]);
    let sheet = compute_balances(&members, &expenses);
    let transfers = plan_settlements(&sheet);

    for (member, residual) in sheet.residuals_after(&transfers) {
        assert_eq!(residual, Money::ZERO, "member {member} left unsettled");
    }
}

#[test]
fn zero_split_expense_changes_nothing() {
    let (members, mut expenses) = build(3, &[9_000], &[0], &[vec![0, 1, 2]]);
    let before = compute_balances(&members, &expenses);
    expenses.push(Expense::new(
        ExpenseId(99),
        Money::from_major(500),
        MemberId(2),
        Vec::new(),
    ));
    assert_eq!(compute_balances(&members, &expenses), before);
}
