use splitledger_config::Config;
use splitledger_domain::DanglingPolicy;

use crate::cli::core::{apply_config, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

const KEYS: &[&str] = &[
    "currency",
    "tolerance",
    "dangling",
    "strict",
    "color",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config [set <currency|tolerance|dangling|strict|color> <value>]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            show(context);
            Ok(())
        }
        ["set", key, value] => {
            set_value(&mut context.config, key, value)?;
            apply_config(&context.config);
            context.persist_config()?;
            output::success(format!("Updated `{}`.", key));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [set <key> <value>]".into(),
        )),
    }
}

fn show(context: &ShellContext) {
    let config = &context.config;
    output::section("Configuration");
    output::row(format!("  currency   : {}", config.currency));
    output::row(format!("  tolerance  : {}", config.tolerance()));
    output::row(format!("  dangling   : {}", config.dangling_references));
    output::row(format!("  strict     : {}", config.strict_validation));
    output::row(format!("  color      : {}", config.ui_color_enabled));
    output::row(format!(
        "  file       : {}",
        context.config_manager.config_path().display()
    ));
}

fn set_value(config: &mut Config, key: &str, value: &str) -> Result<(), CommandError> {
    let invalid = |expected: &str| {
        CommandError::InvalidArguments(format!("invalid value `{value}` for `{key}` ({expected})"))
    };
    match key.to_ascii_lowercase().as_str() {
        "currency" => {
            let label = value.trim();
            if label.is_empty() {
                return Err(invalid("non-empty label"));
            }
            config.currency = label.to_uppercase();
        }
        "tolerance" => {
            let cents: i64 = value.parse().map_err(|_| invalid("whole cents"))?;
            if cents < 1 {
                return Err(invalid("at least 1 cent"));
            }
            config.settle_tolerance_cents = cents;
        }
        "dangling" => {
            config.dangling_references =
                DanglingPolicy::from_str(value).ok_or_else(|| invalid("exclude or lenient"))?;
        }
        "strict" => config.strict_validation = parse_bool(value).ok_or_else(|| invalid("on/off"))?,
        "color" => config.ui_color_enabled = parse_bool(value).ok_or_else(|| invalid("on/off"))?,
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown key `{}` (expected one of: {})",
                key,
                KEYS.join(", ")
            )))
        }
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
