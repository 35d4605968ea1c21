use std::path::PathBuf;

use chrono::{Utc, TimeZone};

use splitledger_core::{
    api_add_expense, api_add_member, api_remove_expense, api_remove_member, api_rename_member,
    api_snapshot_warnings, api_update_expense,
};
use splitledger_domain::{Displayable, ExpenseDraft, ExpenseId, GroupSnapshot, Money};

use crate::cli::core::{parse_date, parse_member_id, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::utils::persistence;

const ADD_EXPENSE_USAGE: &str =
    "add-expense <amount> <payer-id> <description> [--split 1,2,..] [--category NAME] [--date YYYY-MM-DD]";
const EDIT_EXPENSE_USAGE: &str =
    "edit-expense <expense-id> <amount> <payer-id> <description> [--split 1,2,..] [--category NAME] [--date YYYY-MM-DD]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("new", "Start an empty group", "new", cmd_new),
        CommandEntry::new("load", "Load a group snapshot from JSON", "load <path>", cmd_load),
        CommandEntry::new("save", "Write the group snapshot to JSON", "save [path]", cmd_save),
        CommandEntry::new("members", "List group members", "members", cmd_members),
        CommandEntry::new("expenses", "List recorded expenses", "expenses", cmd_expenses),
        CommandEntry::new("add-member", "Add a member to the group", "add-member <name>", cmd_add_member),
        CommandEntry::new(
            "rename-member",
            "Change a member's name",
            "rename-member <id> <name>",
            cmd_rename_member,
        ),
        CommandEntry::new(
            "remove-member",
            "Remove a member no expense refers to",
            "remove-member <id>",
            cmd_remove_member,
        ),
        CommandEntry::new(
            "add-expense",
            "Record an evenly split expense",
            ADD_EXPENSE_USAGE,
            cmd_add_expense,
        ),
        CommandEntry::new(
            "edit-expense",
            "Replace an expense, keeping its id",
            EDIT_EXPENSE_USAGE,
            cmd_edit_expense,
        ),
        CommandEntry::new(
            "remove-expense",
            "Delete an expense",
            "remove-expense <id>",
            cmd_remove_expense,
        ),
        CommandEntry::new("warnings", "List snapshot problems", "warnings", cmd_warnings),
    ]
}

fn cmd_new(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.set_snapshot(GroupSnapshot::default(), None);
    output::success("Started an empty group.");
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [path] = args else {
        return Err(CommandError::InvalidArguments("usage: load <path>".into()));
    };
    let path = PathBuf::from(path);
    let snapshot = persistence::load_snapshot_from_file(&path)?;
    output::success(format!(
        "Loaded {} members and {} expenses from `{}`.",
        snapshot.members.len(),
        snapshot.expenses.len(),
        path.display()
    ));
    context.set_snapshot(snapshot, Some(path.clone()));
    context.update_last_opened(Some(path))
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args {
        [] => context.snapshot_path.clone().ok_or_else(|| {
            CommandError::InvalidArguments("no file yet; use `save <path>`".into())
        })?,
        [path] => PathBuf::from(path),
        _ => return Err(CommandError::InvalidArguments("usage: save [path]".into())),
    };
    persistence::save_snapshot_to_file(context.snapshot()?, &path)?;
    output::success(format!("Saved snapshot to `{}`.", path.display()));
    context.snapshot_path = Some(path.clone());
    context.update_last_opened(Some(path))
}

fn cmd_members(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.snapshot()?;
    output::section("Members");
    if snapshot.members.is_empty() {
        output::info("No members yet.");
        return Ok(());
    }
    for member in &snapshot.members {
        output::row(format!("  [{}] {}", member.avatar_label(), member.display_label()));
    }
    Ok(())
}

fn cmd_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.snapshot()?;
    let currency = &context.config.currency;
    output::section("Expenses");
    if snapshot.expenses.is_empty() {
        output::info("No expenses yet.");
        return Ok(());
    }
    for expense in &snapshot.expenses {
        let label = expense.display_label();
        let payer = snapshot
            .member(expense.paid_by)
            .map(|member| member.name.clone())
            .unwrap_or_else(|| format!("#{}", expense.paid_by));
        let split: Vec<String> = expense
            .participants()
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        output::row(format!(
            "  {:<36} {:>10} {} paid by {:<12} split {}",
            label,
            expense.amount,
            currency,
            payer,
            split.join(",")
        ));
    }
    Ok(())
}

fn cmd_add_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    let snapshot = context.snapshot_mut()?;
    let id = api_add_member(snapshot, &name)?;
    if let Some(member) = snapshot.member(id) {
        output::success(format!("Added member {}.", member.display_label()));
    }
    Ok(())
}

fn cmd_rename_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, name @ ..] = args else {
        return Err(CommandError::InvalidArguments("usage: rename-member <id> <name>".into()));
    };
    let id = parse_member_id(id)?;
    let snapshot = context.snapshot_mut()?;
    api_rename_member(snapshot, id, &name.join(" "))?;
    if let Some(member) = snapshot.member(id) {
        output::success(format!("Renamed member to {}.", member.display_label()));
    }
    Ok(())
}

fn cmd_remove_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::InvalidArguments("usage: remove-member <id>".into()));
    };
    let removed = api_remove_member(context.snapshot_mut()?, parse_member_id(id)?)?;
    output::success(format!("Removed member {}.", removed.display_label()));
    Ok(())
}

fn cmd_add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut draft = parse_expense_args(ADD_EXPENSE_USAGE, args)?;
    draft.created_at.get_or_insert_with(Utc::now);
    let id = api_add_expense(context.snapshot_mut()?, draft)?;
    output::success(format!("Recorded expense #{}.", id));
    Ok(())
}

fn cmd_edit_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, rest @ ..] = args else {
        return Err(CommandError::InvalidArguments(format!("usage: {EDIT_EXPENSE_USAGE}")));
    };
    let id = parse_expense_id(id)?;
    let draft = parse_expense_args(EDIT_EXPENSE_USAGE, rest)?;
    api_update_expense(context.snapshot_mut()?, id, draft)?;
    output::success(format!("Updated expense #{}.", id));
    Ok(())
}

fn cmd_remove_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(CommandError::InvalidArguments("usage: remove-expense <id>".into()));
    };
    let removed = api_remove_expense(context.snapshot_mut()?, parse_expense_id(id)?)?;
    output::success(format!("Removed expense {}.", removed.display_label()));
    Ok(())
}

fn cmd_warnings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let warnings = api_snapshot_warnings(context.snapshot()?);
    if warnings.is_empty() {
        output::success("No problems found.");
    }
    for warning in warnings {
        output::warning(warning);
    }
    Ok(())
}

fn parse_expense_id(input: &str) -> Result<ExpenseId, CommandError> {
    input
        .trim()
        .trim_start_matches('#')
        .parse::<i64>()
        .map(ExpenseId)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid expense id `{input}`")))
}

/// Reads `<amount> <payer-id> <description> [flags]`. Without `--date` the
/// draft carries no timestamp.
fn parse_expense_args(usage_line: &str, args: &[&str]) -> Result<ExpenseDraft, CommandError> {
    let usage = || CommandError::InvalidArguments(format!("usage: {usage_line}"));
    let [amount, payer, rest @ ..] = args else {
        return Err(usage());
    };

    let amount: Money = amount
        .parse()
        .map_err(|err| CommandError::InvalidArguments(format!("invalid amount `{amount}`: {err}")))?;
    let mut draft = ExpenseDraft {
        amount: Some(amount),
        paid_by: Some(parse_member_id(payer)?),
        ..ExpenseDraft::default()
    };

    let mut description = Vec::new();
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match *arg {
            "--split" => {
                let ids = iter.next().ok_or_else(usage)?;
                draft.split_between = Some(
                    ids.split(',')
                        .filter(|id| !id.trim().is_empty())
                        .map(parse_member_id)
                        .collect::<Result<_, _>>()?,
                );
            }
            "--category" => draft.category = Some(iter.next().ok_or_else(usage)?.to_string()),
            "--date" => {
                let date = parse_date(iter.next().ok_or_else(usage)?)?;
                let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(usage)?;
                draft.created_at = Some(Utc.from_utc_datetime(&midnight));
            }
            word => description.push(word),
        }
    }
    draft.description = description.join(" ");
    Ok(draft)
}
