use std::{fs, path::Path};

use splitledger_domain::GroupSnapshot;

use crate::errors::SnapshotError;

/// Writes the snapshot to disk atomically by staging to a temporary file.
pub fn save_snapshot_to_file(snapshot: &GroupSnapshot, path: &Path) -> Result<(), SnapshotError> {
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Loads a `{members, expenses}` snapshot from disk.
pub fn load_snapshot_from_file(path: &Path) -> Result<GroupSnapshot, SnapshotError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitledger_domain::{Expense, ExpenseId, Member, MemberId, Money};
    use tempfile::tempdir;

    #[test]
    fn saved_snapshot_loads_back() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("trip.json");
        let snapshot = GroupSnapshot::new(
            vec![Member::new(MemberId(1), "Ana"), Member::new(MemberId(2), "Ben")],
            vec![Expense::new(ExpenseId(1), Money::from_cents(1999), MemberId(2), [MemberId(1)])
                .with_description("Tickets")],
        );

        save_snapshot_to_file(&snapshot, &path).expect("save");
        let loaded = load_snapshot_from_file(&path).expect("load");

        assert_eq!(loaded.members, snapshot.members);
        assert_eq!(loaded.expenses, snapshot.expenses);
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = load_snapshot_from_file(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }
}
