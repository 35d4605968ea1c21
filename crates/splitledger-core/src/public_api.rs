//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! Frontends (CLI, FFI) call these instead of wiring the calculator, planner
//! and validators together themselves.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use splitledger_domain::{
    BalanceSheet, DanglingPolicy, Expense, ExpenseDraft, ExpenseId, GroupSnapshot, Member,
    MemberId, Money, Transfer,
};

use crate::{
    balance_service::BalanceCalculator,
    diagnostics::snapshot_warnings,
    expense_service::ExpenseService,
    member_service::MemberService,
    settlement_service::{SettlementPlanner, DEFAULT_TOLERANCE},
    stats_service::{ExpenseStats, MemberStats, StatsService},
    CoreError,
};

/// Knobs for one balance/settlement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOptions {
    pub tolerance: Money,
    pub dangling: DanglingPolicy,
    /// Reject the snapshot up front instead of skipping bad expenses.
    pub strict: bool,
}

impl Default for SettlementOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            dangling: DanglingPolicy::default(),
            strict: true,
        }
    }
}

/// Balance entry as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportBalance {
    pub name: String,
    pub avatar: String,
    pub paid: Money,
    pub owes: Money,
    pub balance: Money,
}

/// Transfer as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTransfer {
    pub from_id: MemberId,
    pub from: String,
    pub to_id: MemberId,
    pub to: String,
    pub amount: Money,
}

impl From<Transfer> for ReportTransfer {
    fn from(transfer: Transfer) -> Self {
        Self {
            from_id: transfer.from_id,
            from: transfer.from_name,
            to_id: transfer.to_id,
            to: transfer.to_name,
            amount: transfer.amount,
        }
    }
}

/// Balances keyed by member id plus the planned settlements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub balances: BTreeMap<MemberId, ReportBalance>,
    pub settlements: Vec<ReportTransfer>,
}

impl BalanceReport {
    pub fn from_parts(sheet: &BalanceSheet, transfers: Vec<Transfer>) -> Self {
        let balances = sheet
            .iter()
            .map(|entry| {
                (
                    entry.member_id,
                    ReportBalance {
                        name: entry.name.clone(),
                        avatar: entry.avatar.clone(),
                        paid: entry.paid,
                        owes: entry.owes,
                        balance: entry.balance(),
                    },
                )
            })
            .collect();
        Self {
            balances,
            settlements: transfers.into_iter().map(ReportTransfer::from).collect(),
        }
    }
}

/// Computes balances, validating first when `options.strict` is set.
pub fn api_compute_balances(
    snapshot: &GroupSnapshot,
    options: &SettlementOptions,
) -> Result<BalanceSheet, CoreError> {
    if options.strict {
        ExpenseService::validate_all(snapshot)?;
    }
    Ok(BalanceCalculator::new(options.dangling).compute(&snapshot.members, &snapshot.expenses))
}

/// Plans transfers for an already computed sheet.
pub fn api_plan_settlements(sheet: &BalanceSheet, options: &SettlementOptions) -> Vec<Transfer> {
    SettlementPlanner::new(options.tolerance).plan(sheet)
}

/// Balances and settlements in one call.
pub fn api_compute_report(
    snapshot: &GroupSnapshot,
    options: &SettlementOptions,
) -> Result<BalanceReport, CoreError> {
    let sheet = api_compute_balances(snapshot, options)?;
    let transfers = api_plan_settlements(&sheet, options);
    Ok(BalanceReport::from_parts(&sheet, transfers))
}

pub fn api_expense_stats(snapshot: &GroupSnapshot, today: NaiveDate) -> ExpenseStats {
    StatsService::summarize(snapshot, today)
}

pub fn api_member_stats(
    snapshot: &GroupSnapshot,
    member_id: MemberId,
) -> Result<MemberStats, CoreError> {
    StatsService::member_stats(snapshot, member_id)
}

pub fn api_snapshot_warnings(snapshot: &GroupSnapshot) -> Vec<String> {
    snapshot_warnings(snapshot)
}

/// Adds a member with the next free id and returns that id.
pub fn api_add_member(snapshot: &mut GroupSnapshot, name: &str) -> Result<MemberId, CoreError> {
    let next = snapshot.members.iter().map(|m| m.id.0).max().unwrap_or(0) + 1;
    let member = MemberService::create(MemberId(next), name)?;
    snapshot.members.push(member);
    Ok(MemberId(next))
}

/// Validates `draft` against the roster and appends it with the next free id.
pub fn api_add_expense(
    snapshot: &mut GroupSnapshot,
    draft: ExpenseDraft,
) -> Result<ExpenseId, CoreError> {
    let next = snapshot.expenses.iter().map(|e| e.id.0).max().unwrap_or(0) + 1;
    let expense: Expense = ExpenseService::normalize(&snapshot.members, ExpenseId(next), draft)?;
    snapshot.expenses.push(expense);
    Ok(ExpenseId(next))
}

/// Renames a member. The avatar is derived again from the new name.
pub fn api_rename_member(
    snapshot: &mut GroupSnapshot,
    id: MemberId,
    name: &str,
) -> Result<(), CoreError> {
    MemberService::rename(&mut snapshot.members, id, name)
}

/// Removes a member that no expense refers to.
///
/// Members who paid for or share in any expense are kept, so the snapshot
/// never gains a dangling reference; remove or edit those expenses first.
pub fn api_remove_member(snapshot: &mut GroupSnapshot, id: MemberId) -> Result<Member, CoreError> {
    let position = snapshot
        .members
        .iter()
        .position(|member| member.id == id)
        .ok_or(CoreError::MemberNotFound(id))?;
    let expenses = snapshot
        .expenses
        .iter()
        .filter(|expense| expense.paid_by == id || expense.split_between.contains(&id))
        .count();
    if expenses > 0 {
        return Err(CoreError::MemberInUse {
            member: id,
            expenses,
        });
    }
    Ok(snapshot.members.remove(position))
}

/// Replaces an expense with a validated draft, keeping its id. The original
/// timestamp is kept when the draft carries none.
pub fn api_update_expense(
    snapshot: &mut GroupSnapshot,
    id: ExpenseId,
    mut draft: ExpenseDraft,
) -> Result<(), CoreError> {
    let position = snapshot
        .expenses
        .iter()
        .position(|expense| expense.id == id)
        .ok_or(CoreError::ExpenseNotFound(id))?;
    if draft.created_at.is_none() {
        draft.created_at = snapshot.expenses[position].created_at;
    }
    let expense = ExpenseService::normalize(&snapshot.members, id, draft)?;
    snapshot.expenses[position] = expense;
    Ok(())
}

pub fn api_remove_expense(snapshot: &mut GroupSnapshot, id: ExpenseId) -> Result<Expense, CoreError> {
    let position = snapshot
        .expenses
        .iter()
        .position(|expense| expense.id == id)
        .ok_or(CoreError::ExpenseNotFound(id))?;
    Ok(snapshot.expenses.remove(position))
}
