use assert_cmd::Command;
use assert_fs::{prelude::*, TempDir};
use predicates::prelude::*;
use predicates::str::contains;

const TRIP: &str = r#"{
  "members": [
    {"id": 1, "name": "Ana"},
    {"id": 2, "name": "Ben"},
    {"id": 3, "name": "Cy"}
  ],
  "expenses": [
    {"id": 1, "description": "Cabin", "amount": "90.00", "paidBy": 1,
     "category": "Lodging", "splitBetween": [1, 2, 3],
     "createdAt": "2024-03-09T18:00:00Z"}
  ]
}"#;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("splitledger_cli").unwrap();
    cmd.env("SPLITLEDGER_CLI_SCRIPT", "1")
        .env("SPLITLEDGER_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_settles_loaded_snapshot() {
    let home = TempDir::new().unwrap();
    let trip = home.child("trip.json");
    trip.write_str(TRIP).unwrap();

    cli(&home)
        .write_stdin(format!("load {}\nbalances\nsettle\nexit\n", trip.path().display()))
        .assert()
        .success()
        .stdout(contains("Loaded 3 members and 1 expenses"))
        .stdout(contains("60.00"))
        .stdout(contains("-30.00"))
        .stdout(contains("Ben -> Ana: 30.00 USD"))
        .stdout(contains("Cy -> Ana: 30.00 USD"));

    home.child("config/config.json")
        .assert(predicate::str::contains("trip.json"));
}

#[test]
fn script_mode_builds_group_and_saves_it() {
    let home = TempDir::new().unwrap();
    let out = home.child("group.json");

    let script = format!(
        "new\nadd-member Ana\nadd-member Ben\nadd-expense 100 1 Groceries\nadd-expense 50 2 Fuel --category Travel\nsettle\nsave {}\nexit\n",
        out.path().display()
    );
    cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Added member Ben (#2)."))
        .stdout(contains("Recorded expense #2."))
        .stdout(contains("Ben -> Ana: 25.00 USD"));

    out.assert(predicate::str::contains("\"Groceries\""));
    out.assert(predicate::str::contains("\"Travel\""));
}

#[test]
fn stats_and_member_reports() {
    let home = TempDir::new().unwrap();
    let trip = home.child("trip.json");
    trip.write_str(TRIP).unwrap();

    cli(&home)
        .write_stdin(format!(
            "load {}\nstats 2024-03-10\nmember 2\nexit\n",
            trip.path().display()
        ))
        .assert()
        .success()
        .stdout(contains("Lodging"))
        .stdout(contains("2024-03-09"))
        .stdout(contains("Share     : 30.00"));
}

#[test]
fn strict_validation_reports_dangling_payer() {
    let home = TempDir::new().unwrap();
    let trip = home.child("bad.json");
    trip.write_str(
        r#"{"members": [{"id": 1, "name": "Ana"}],
            "expenses": [{"id": 1, "amount": 10, "paidBy": 7, "splitBetween": [1]}]}"#,
    )
    .unwrap();

    cli(&home)
        .write_stdin(format!(
            "load {}\nsettle\nconfig set strict off\nsettle\nexit\n",
            trip.path().display()
        ))
        .assert()
        .success()
        .stdout(contains("unknown payer 7"))
        .stdout(contains("Member not found: 7"))
        .stdout(contains("Everyone is settled up."));
}

#[test]
fn unknown_command_gets_suggestion() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("setle\nbalances\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `setle`"))
        .stdout(contains("Suggestion: `settle`?"))
        .stdout(contains("No snapshot loaded."));
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("help\nhelp add-expense\nexit\n")
        .assert()
        .success()
        .stdout(contains("Available commands"))
        .stdout(contains("balances"))
        .stdout(contains("Usage: add-expense <amount> <payer-id>"));
}

#[test]
fn script_mode_edits_and_removes_entries() {
    let home = TempDir::new().unwrap();
    let trip = home.child("trip.json");
    trip.write_str(TRIP).unwrap();

    let script = format!(
        "load {}\nrename-member 2 Bea\nremove-member 3\nedit-expense 1 60 1 Cabin --split 1,2\nremove-member 3\nsettle\nremove-expense 1\nsave\nexit\n",
        trip.path().display()
    );
    cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Renamed member to Bea (#2)."))
        .stdout(contains("Member 3 is still part of 1 expense(s)"))
        .stdout(contains("Updated expense #1."))
        .stdout(contains("Removed member Cy (#3)."))
        .stdout(contains("Bea -> Ana: 30.00 USD"))
        .stdout(contains("Removed expense expense:1 Cabin [Other]."));

    trip.assert(predicate::str::contains("\"Bea\""));
    trip.assert(predicate::str::contains("\"expenses\": []"));
}
