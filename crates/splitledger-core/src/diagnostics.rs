//! Non-failing checks that describe what is wrong with a snapshot.

use std::collections::HashSet;

use splitledger_domain::GroupSnapshot;

/// Lists problems in `snapshot` that the calculator would otherwise skip or
/// exclude. Never fails; an empty list means the snapshot is clean.
pub fn snapshot_warnings(snapshot: &GroupSnapshot) -> Vec<String> {
    let member_ids: HashSet<_> = snapshot.members.iter().map(|m| m.id).collect();
    let mut warnings = Vec::new();

    if member_ids.len() != snapshot.members.len() {
        warnings.push("roster contains duplicate member ids".to_string());
    }

    for expense in &snapshot.expenses {
        if !member_ids.contains(&expense.paid_by) {
            warnings.push(format!(
                "expense {} references unknown payer {}",
                expense.id, expense.paid_by
            ));
        }
        let participants = expense.participants();
        if participants.is_empty() {
            warnings.push(format!("expense {} has an empty split", expense.id));
        }
        for member_id in participants {
            if !member_ids.contains(&member_id) {
                warnings.push(format!(
                    "expense {} references unknown participant {}",
                    expense.id, member_id
                ));
            }
        }
        if !expense.amount.is_positive() {
            warnings.push(format!(
                "expense {} has non-positive amount {}",
                expense.id, expense.amount
            ));
        }
    }
    warnings
}
