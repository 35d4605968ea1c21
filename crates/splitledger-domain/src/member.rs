//! Members sharing an expense pool.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
/// Identifier of a member, unique within one calculation scope.
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<i64> for MemberId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        let name = name.into().trim().to_string();
        let avatar = avatar_for(&name);
        Self {
            id,
            name,
            avatar,
        }
    }

    /// Returns the stored avatar, falling back to the name's initial.
    pub fn avatar_label(&self) -> String {
        self.avatar
            .clone()
            .or_else(|| avatar_for(&self.name))
            .unwrap_or_default()
    }
}

/// Upper-cased first character of a display name.
pub fn avatar_for(name: &str) -> Option<String> {
    name.trim()
        .chars()
        .next()
        .map(|initial| initial.to_uppercase().collect())
}

impl Identifiable for Member {
    type Id = MemberId;

    fn id(&self) -> MemberId {
        self.id
    }
}

impl NamedEntity for Member {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Member {
    fn display_label(&self) -> String {
        format!("{} (#{})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trims_name_and_derives_avatar() {
        let member = Member::new(MemberId(7), "  alice ");
        assert_eq!(member.name, "alice");
        assert_eq!(member.avatar.as_deref(), Some("A"));
        assert_eq!(member.display_label(), "alice (#7)");
    }

    #[test]
    fn avatar_label_falls_back_to_initial() {
        let member: Member = serde_json::from_str(r#"{"id": 3, "name": "bob"}"#).unwrap();
        assert_eq!(member.id, MemberId(3));
        assert!(member.avatar.is_none());
        assert_eq!(member.avatar_label(), "B");
    }
}
