//! Read-only spending statistics over a group snapshot.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use splitledger_domain::{Amounted, GroupSnapshot, MemberId, Money};

use crate::{balance_service::participant_shares, member_service::MemberService, CoreError};

/// Days covered by the spending trend, today included.
pub const TREND_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPaidTotal {
    pub id: MemberId,
    pub name: String,
    pub total_paid: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseStats {
    pub total: Money,
    pub count: usize,
    pub by_category: Vec<CategoryTotal>,
    pub by_member: Vec<MemberPaidTotal>,
    pub daily_trend: Vec<DailyTotal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub total_paid: Money,
    pub expense_count: usize,
    pub total_owed: Money,
}

pub struct StatsService;

impl StatsService {
    /// Totals by category, by payer and by day for the trailing week ending
    /// on `today`. Expenses without a timestamp are left out of the trend.
    pub fn summarize(snapshot: &GroupSnapshot, today: NaiveDate) -> ExpenseStats {
        let total: Money = snapshot.expenses.iter().map(Amounted::amount).sum();

        let mut categories: HashMap<&str, Money> = HashMap::new();
        for expense in &snapshot.expenses {
            *categories.entry(expense.category.as_str()).or_default() += expense.amount;
        }
        let mut by_category: Vec<CategoryTotal> = categories
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category: category.to_string(),
                total,
            })
            .collect();
        by_category.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));

        let by_member = snapshot
            .members
            .iter()
            .map(|member| MemberPaidTotal {
                id: member.id,
                name: member.name.clone(),
                total_paid: snapshot
                    .expenses
                    .iter()
                    .filter(|expense| expense.paid_by == member.id)
                    .map(|expense| expense.amount)
                    .sum(),
            })
            .collect();

        let window_start = today - Duration::days(TREND_WINDOW_DAYS - 1);
        let mut days: BTreeMap<NaiveDate, Money> = BTreeMap::new();
        for expense in &snapshot.expenses {
            let Some(created_at) = expense.created_at else {
                continue;
            };
            let date = created_at.date_naive();
            if date >= window_start && date <= today {
                *days.entry(date).or_default() += expense.amount;
            }
        }
        let daily_trend = days
            .into_iter()
            .map(|(date, total)| DailyTotal { date, total })
            .collect();

        ExpenseStats {
            total,
            count: snapshot.expenses.len(),
            by_category,
            by_member,
            daily_trend,
        }
    }

    /// What `member_id` paid, how many expenses they paid for, and the sum of
    /// their shares across every expense they take part in.
    pub fn member_stats(snapshot: &GroupSnapshot, member_id: MemberId) -> Result<MemberStats, CoreError> {
        MemberService::find(&snapshot.members, member_id)?;

        let mut stats = MemberStats {
            total_paid: Money::ZERO,
            expense_count: 0,
            total_owed: Money::ZERO,
        };
        for expense in &snapshot.expenses {
            if expense.paid_by == member_id {
                stats.total_paid += expense.amount;
                stats.expense_count += 1;
            }
            if let Some((_, share)) = participant_shares(expense)
                .into_iter()
                .find(|(participant, _)| *participant == member_id)
            {
                stats.total_owed += share;
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use splitledger_domain::{Expense, ExpenseId, Member};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).expect("valid date")
    }

    fn snapshot() -> GroupSnapshot {
        let at = |d: u32| Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap();
        GroupSnapshot::new(
            vec![
                Member::new(MemberId(1), "Ana"),
                Member::new(MemberId(2), "Ben"),
                Member::new(MemberId(3), "Cy"),
            ],
            vec![
                Expense::new(ExpenseId(1), Money::from_major(30), MemberId(1), [MemberId(1), MemberId(2)])
                    .with_category("Food")
                    .with_created_at(at(10)),
                Expense::new(ExpenseId(2), Money::from_major(60), MemberId(2), [MemberId(1), MemberId(2)])
                    .with_category("Travel")
                    .with_created_at(at(2)),
                Expense::new(ExpenseId(3), Money::from_major(30), MemberId(1), [MemberId(3)])
                    .with_category("Drinks")
                    .with_created_at(at(10)),
                Expense::new(ExpenseId(4), Money::from_cents(100), MemberId(3), [MemberId(1), MemberId(2), MemberId(3)])
                    .with_created_at(at(8)),
            ],
        )
    }

    #[test]
    fn summarize_groups_by_category_member_and_day() {
        let stats = StatsService::summarize(&snapshot(), day(10));

        assert_eq!(stats.total, Money::from_cents(12_100));
        assert_eq!(stats.count, 4);

        let categories: Vec<_> = stats
            .by_category
            .iter()
            .map(|c| (c.category.as_str(), c.total.cents()))
            .collect();
        assert_eq!(
            categories,
            vec![("Travel", 6000), ("Drinks", 3000), ("Food", 3000), ("Other", 100)]
        );

        let paid: Vec<_> = stats.by_member.iter().map(|m| (m.id.0, m.total_paid.cents())).collect();
        assert_eq!(paid, vec![(1, 6000), (2, 6000), (3, 100)]);

        let trend: Vec<_> = stats.daily_trend.iter().map(|d| (d.date, d.total.cents())).collect();
        assert_eq!(trend, vec![(day(8), 100), (day(10), 6000)]);
    }

    #[test]
    fn trend_window_includes_six_days_back() {
        let stats = StatsService::summarize(&snapshot(), day(8));
        let dates: Vec<_> = stats.daily_trend.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![day(2), day(8)]);
    }

    #[test]
    fn member_stats_use_cent_allocation() {
        let stats = StatsService::member_stats(&snapshot(), MemberId(1)).expect("member exists");
        assert_eq!(stats.total_paid, Money::from_major(60));
        assert_eq!(stats.expense_count, 2);
        assert_eq!(stats.total_owed, Money::from_cents(1500 + 3000 + 34));

        let cy = StatsService::member_stats(&snapshot(), MemberId(3)).expect("member exists");
        assert_eq!(cy.total_owed, Money::from_cents(3000 + 33));
    }

    #[test]
    fn member_stats_reject_unknown_member() {
        assert!(matches!(
            StatsService::member_stats(&snapshot(), MemberId(42)),
            Err(CoreError::MemberNotFound(MemberId(42)))
        ));
    }
}
