//! Domain models for shared expenses.

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{common::*, member::MemberId, money::Money};

/// Category assigned when an expense does not name one.
pub const DEFAULT_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct ExpenseId(pub i64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for ExpenseId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    #[serde(default)]
    pub description: String,
    pub amount: Money,
    pub paid_by: MemberId,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub split_between: Vec<MemberId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn new(
        id: ExpenseId,
        amount: Money,
        paid_by: MemberId,
        split_between: impl IntoIterator<Item = MemberId>,
    ) -> Self {
        Self {
            id,
            description: String::new(),
            amount,
            paid_by,
            category: default_category(),
            split_between: split_between.into_iter().collect(),
            created_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Distinct participants in ascending id order.
    pub fn participants(&self) -> BTreeSet<MemberId> {
        self.split_between.iter().copied().collect()
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Identifiable for Expense {
    type Id = ExpenseId;

    fn id(&self) -> ExpenseId {
        self.id
    }
}

impl Amounted for Expense {
    fn amount(&self) -> Money {
        self.amount
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        if self.description.is_empty() {
            format!("expense:{} [{}]", self.id, self.category)
        } else {
            format!("expense:{} {} [{}]", self.id, self.description, self.category)
        }
    }
}

/// Unvalidated expense input as submitted by a caller.
///
/// A missing split list means "everyone in the roster".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    #[serde(default)]
    pub description: String,
    pub amount: Option<Money>,
    pub paid_by: Option<MemberId>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub split_between: Option<Vec<MemberId>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
