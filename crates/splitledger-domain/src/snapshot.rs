//! Immutable member/expense snapshot handed to the calculators.

use serde::{Deserialize, Serialize};

use crate::{
    expense::Expense,
    member::{Member, MemberId},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupSnapshot {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl GroupSnapshot {
    pub fn new(members: Vec<Member>, expenses: Vec<Expense>) -> Self {
        Self { members, expenses }
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }
}
