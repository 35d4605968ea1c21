use splitledger_core::{api_compute_balances, api_plan_settlements};

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("balances", "Show paid, owed and net per member", "balances", cmd_balances),
        CommandEntry::new("settle", "Plan transfers that settle all balances", "settle", cmd_settle),
    ]
}

fn cmd_balances(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let options = context.settlement_options();
    let sheet = api_compute_balances(context.snapshot()?, &options)?;

    output::section(format!("Balances ({})", context.config.currency));
    if sheet.is_empty() {
        output::info("No members yet.");
        return Ok(());
    }
    output::row(format!(
        "  {:<4} {:<16} {:>10} {:>10} {:>10}",
        "Id", "Member", "Paid", "Owes", "Balance"
    ));
    for entry in &sheet {
        output::row(format!(
            "  {:<4} {:<16} {:>10} {:>10} {:>10}",
            entry.member_id,
            entry.name,
            entry.paid,
            entry.owes,
            entry.balance()
        ));
    }
    Ok(())
}

fn cmd_settle(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let options = context.settlement_options();
    let sheet = api_compute_balances(context.snapshot()?, &options)?;
    let transfers = api_plan_settlements(&sheet, &options);

    output::section("Settlements");
    if transfers.is_empty() {
        output::success("Everyone is settled up.");
        return Ok(());
    }
    for transfer in &transfers {
        output::row(format!(
            "  {} -> {}: {} {}",
            transfer.from_name, transfer.to_name, transfer.amount, context.config.currency
        ));
    }
    output::info(format!("{} transfer(s).", transfers.len()));
    Ok(())
}
