//! Shared traits and enums for expense-splitting primitives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Exposes a stable identifier for entities taking part in a calculation.
pub trait Identifiable {
    type Id: Copy + Eq;

    fn id(&self) -> Self::Id;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> Money;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
/// Controls how expenses that reference unknown members are aggregated.
pub enum DanglingPolicy {
    /// Leaves the whole expense out so paid and owed totals stay consistent.
    #[default]
    Exclude,
    /// Drops only the unknown payer or participant contribution.
    Lenient,
}

impl DanglingPolicy {
    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exclude" => Some(DanglingPolicy::Exclude),
            "lenient" => Some(DanglingPolicy::Lenient),
            _ => None,
        }
    }
}

impl fmt::Display for DanglingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DanglingPolicy::Exclude => "exclude",
            DanglingPolicy::Lenient => "lenient",
        };
        f.write_str(label)
    }
}
