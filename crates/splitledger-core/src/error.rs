use thiserror::Error;

use splitledger_domain::{ExpenseId, MemberId};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),
    #[error("Member {member} is still part of {expenses} expense(s)")]
    MemberInUse { member: MemberId, expenses: usize },
    #[error("Duplicate member id: {0}")]
    DuplicateMember(MemberId),
    #[error("Expense {expense} is invalid: {reason}")]
    InvalidExpense { expense: ExpenseId, reason: String },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Serialization error: {0}")]
    Serde(String),
}
