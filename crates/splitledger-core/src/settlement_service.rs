//! Turns net balances into a short list of debtor-to-creditor transfers.

use tracing::{debug, warn};

use splitledger_domain::{BalanceSheet, MemberId, Money, Transfer};

/// Balances whose magnitude does not exceed this are treated as settled.
pub const DEFAULT_TOLERANCE: Money = Money::from_cents(1);

#[derive(Debug)]
struct Party<'a> {
    id: MemberId,
    name: &'a str,
    amount: Money,
}

/// Greedy largest-debtor to largest-creditor matcher.
///
/// This is an approximation of the minimum-transfer problem (which is a
/// subset-sum style search over zero-sum partitions). It is optimal in the
/// common cases and always emits at most `debtors + creditors - 1` transfers.
#[derive(Debug, Clone, Copy)]
pub struct SettlementPlanner {
    tolerance: Money,
}

impl Default for SettlementPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

impl SettlementPlanner {
    /// Creates a planner. The tolerance is clamped to at least one cent.
    pub fn new(tolerance: Money) -> Self {
        Self {
            tolerance: tolerance.abs().max(DEFAULT_TOLERANCE),
        }
    }

    pub fn tolerance(&self) -> Money {
        self.tolerance
    }

    /// Plans transfers for `sheet` without modifying it.
    ///
    /// Members within the tolerance of zero (inclusive) take no part. Debtors
    /// and creditors are each sorted by amount, largest first; ties keep
    /// roster order. A two-pointer sweep then pays the current creditor from
    /// the current debtor until one of the two lists is exhausted. Amounts at
    /// or below the tolerance are never emitted, but still count against both
    /// sides so the sweep keeps moving.
    pub fn plan(&self, sheet: &BalanceSheet) -> Vec<Transfer> {
        let tolerance = self.tolerance;
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();

        for entry in sheet {
            let balance = entry.balance();
            if balance < -tolerance {
                debtors.push(Party {
                    id: entry.member_id,
                    name: &entry.name,
                    amount: balance.abs(),
                });
            } else if balance > tolerance {
                creditors.push(Party {
                    id: entry.member_id,
                    name: &entry.name,
                    amount: balance,
                });
            }
        }

        debtors.sort_by(|a, b| b.amount.cmp(&a.amount));
        creditors.sort_by(|a, b| b.amount.cmp(&a.amount));

        let total_debt: Money = debtors.iter().map(|party| party.amount).sum();
        let total_credit: Money = creditors.iter().map(|party| party.amount).sum();
        if total_debt != total_credit {
            warn!(
                %total_debt,
                %total_credit,
                "debt and credit totals differ; some balances will remain open"
            );
        }

        let mut transfers = Vec::with_capacity((debtors.len() + creditors.len()).saturating_sub(1));
        let (mut i, mut j) = (0usize, 0usize);
        while i < debtors.len() && j < creditors.len() {
            let amount = debtors[i].amount.min(creditors[j].amount);
            if amount > tolerance {
                transfers.push(Transfer {
                    from_id: debtors[i].id,
                    from_name: debtors[i].name.to_string(),
                    to_id: creditors[j].id,
                    to_name: creditors[j].name.to_string(),
                    amount,
                });
            }

            debtors[i].amount -= amount;
            creditors[j].amount -= amount;
            if debtors[i].amount < tolerance {
                i += 1;
            }
            if creditors[j].amount < tolerance {
                j += 1;
            }
        }

        debug!(
            debtors = debtors.len(),
            creditors = creditors.len(),
            transfers = transfers.len(),
            "planned settlements"
        );
        transfers
    }
}

/// Plans transfers with the default one-cent tolerance.
pub fn plan_settlements(sheet: &BalanceSheet) -> Vec<Transfer> {
    SettlementPlanner::default().plan(sheet)
}
