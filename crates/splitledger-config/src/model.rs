use serde::{de::Deserializer, Deserialize, Serialize};
use std::path::PathBuf;

use splitledger_domain::{DanglingPolicy, Money};

/// Stores user-configurable settlement preferences and CLI metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display label only; all amounts share one implicit currency.
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_settle_tolerance_cents")]
    pub settle_tolerance_cents: i64,
    #[serde(default, deserialize_with = "deserialize_dangling_policy")]
    pub dangling_references: DanglingPolicy,
    #[serde(default = "Config::default_strict_validation")]
    pub strict_validation: bool,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_snapshot: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            settle_tolerance_cents: Self::default_settle_tolerance_cents(),
            dangling_references: DanglingPolicy::default(),
            strict_validation: Self::default_strict_validation(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_opened_snapshot: None,
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn default_settle_tolerance_cents() -> i64 {
        1
    }

    pub fn default_strict_validation() -> bool {
        true
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Settlement tolerance as money; never below one cent.
    pub fn tolerance(&self) -> Money {
        Money::from_cents(self.settle_tolerance_cents.max(1))
    }
}

/// Unknown or missing policy names fall back to the default instead of
/// failing the whole load.
fn deserialize_dangling_policy<'de, D>(deserializer: D) -> Result<DanglingPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .as_deref()
        .and_then(DanglingPolicy::from_str)
        .unwrap_or_default())
}
