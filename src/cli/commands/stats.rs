use chrono::{NaiveDate, Utc};

use splitledger_core::{api_expense_stats, api_member_stats};

use crate::cli::core::{
    parse_date, parse_member_id, CommandError, CommandResult, ShellContext,
};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "stats",
            "Spending by category, payer and day",
            "stats [YYYY-MM-DD]",
            cmd_stats,
        ),
        CommandEntry::new("member", "Totals for one member", "member <id>", cmd_member),
    ]
}

/// Last day of the trend window. Expense timestamps are bucketed by UTC
/// date, so the default is today's UTC date.
fn trend_end(arg: Option<&str>) -> Result<NaiveDate, CommandError> {
    match arg {
        Some(date) => parse_date(date),
        None => Ok(Utc::now().date_naive()),
    }
}

fn cmd_stats(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let today = trend_end(args.first().copied())?;
    let stats = api_expense_stats(context.snapshot()?, today);
    let currency = &context.config.currency;

    output::section("Spending");
    output::row(format!("  Total     : {} {}", stats.total, currency));
    output::row(format!("  Expenses  : {}", stats.count));

    output::section("By category");
    for category in &stats.by_category {
        output::row(format!("  {:<16} {:>10}", category.category, category.total));
    }

    output::section("By payer");
    for member in &stats.by_member {
        output::row(format!("  {:<16} {:>10}", member.name, member.total_paid));
    }

    output::section(format!("Last 7 days to {}", today));
    if stats.daily_trend.is_empty() {
        output::info("No dated expenses in this window.");
    }
    for day in &stats.daily_trend {
        output::row(format!("  {} {:>10}", day.date, day.total));
    }
    Ok(())
}

fn cmd_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::InvalidArguments("usage: member <id>".into()));
    };
    let member_id = parse_member_id(id)?;
    let snapshot = context.snapshot()?;
    let stats = api_member_stats(snapshot, member_id)?;
    let name = snapshot
        .member(member_id)
        .map(|member| member.name.as_str())
        .unwrap_or_default();

    output::section(format!("Member #{} {}", member_id, name));
    output::row(format!("  Paid      : {}", stats.total_paid));
    output::row(format!("  Expenses  : {}", stats.expense_count));
    output::row(format!("  Share     : {}", stats.total_owed));
    output::row(format!("  Net       : {}", stats.total_paid - stats.total_owed));
    Ok(())
}
