//! Ingestion-time validation for expenses.
//!
//! Rejecting bad input here keeps the calculator's conservation invariant
//! intact: once a snapshot passes [`ExpenseService::validate_all`], every
//! payer and participant resolves to a roster member.

use std::collections::{BTreeSet, HashSet};

use splitledger_domain::{
    Expense, ExpenseDraft, ExpenseId, GroupSnapshot, Member, MemberId, Money, DEFAULT_CATEGORY,
};

use crate::{member_service::MemberService, CoreError};

pub struct ExpenseService;

impl ExpenseService {
    /// Checks a single expense against the roster.
    pub fn validate(members: &[Member], expense: &Expense) -> Result<(), CoreError> {
        if !expense.amount.is_positive() {
            return Err(CoreError::InvalidExpense {
                expense: expense.id,
                reason: format!("amount must be positive, got {}", expense.amount),
            });
        }
        if expense.amount.exceeds_max() {
            return Err(CoreError::InvalidExpense {
                expense: expense.id,
                reason: format!("amount must not exceed {}", Money::MAX_AMOUNT),
            });
        }
        let participants = expense.participants();
        if participants.is_empty() {
            return Err(CoreError::InvalidExpense {
                expense: expense.id,
                reason: "split set is empty".into(),
            });
        }
        MemberService::find(members, expense.paid_by)?;
        for member_id in participants {
            MemberService::find(members, member_id)?;
        }
        Ok(())
    }

    /// Validates the roster and every expense; stops at the first failure.
    ///
    /// The expense total must also fit in a [`Money`], which bounds every
    /// paid, owed and net figure the calculator can produce.
    pub fn validate_all(snapshot: &GroupSnapshot) -> Result<(), CoreError> {
        MemberService::validate_roster(&snapshot.members)?;
        let mut seen: HashSet<ExpenseId> = HashSet::with_capacity(snapshot.expenses.len());
        let mut total = Money::ZERO;
        for expense in &snapshot.expenses {
            if !seen.insert(expense.id) {
                return Err(CoreError::InvalidExpense {
                    expense: expense.id,
                    reason: "duplicate expense id".into(),
                });
            }
            Self::validate(&snapshot.members, expense)?;
            total = total.checked_add(expense.amount).ok_or_else(|| {
                CoreError::Validation("expense amounts add up beyond the supported range".into())
            })?;
        }
        Ok(())
    }

    /// Turns caller input into a validated [`Expense`].
    ///
    /// A missing split list means the whole roster; a blank category becomes
    /// [`DEFAULT_CATEGORY`]. Split ids are deduplicated and sorted.
    pub fn normalize(
        members: &[Member],
        id: ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<Expense, CoreError> {
        let description = draft.description.trim();
        let (amount, paid_by) = match (draft.amount, draft.paid_by) {
            (Some(amount), Some(paid_by)) if !description.is_empty() => (amount, paid_by),
            _ => {
                return Err(CoreError::Validation(
                    "Description, amount, and paidBy are required".into(),
                ))
            }
        };

        let split: BTreeSet<MemberId> = match draft.split_between {
            Some(ids) => ids.into_iter().collect(),
            None => members.iter().map(|member| member.id).collect(),
        };
        let category = draft
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        let mut expense = Expense::new(id, amount, paid_by, split)
            .with_description(description)
            .with_category(category);
        expense.created_at = draft.created_at;

        Self::validate(members, &expense)?;
        Ok(expense)
    }
}
