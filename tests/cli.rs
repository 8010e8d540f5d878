#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Books {
    _dir: TempDir,
    db: std::path::PathBuf,
}

impl Books {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("fintrack.db");
        Self { _dir: dir, db }
    }

    fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("fintrack").unwrap();
        cmd.env_remove("FINTRACK_LOG")
            .arg("--db")
            .arg(&self.db)
            .args(args);
        cmd
    }
}

#[test]
fn add_then_view_recent() {
    let books = Books::new();
    books
        .cmd(&[
            "add", "--amount", "40", "--type", "expense", "--category", "Food", "--desc", "lunch",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Transaction added: EXPENSE of $40.00 for 'Food'",
        ));

    books
        .cmd(&["view-recent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- Recent Transactions ---"))
        .stdout(predicate::str::contains("EXPENSE"))
        .stdout(predicate::str::contains("$   40.00 (Food) - lunch"));
}

#[test]
fn view_recent_when_empty() {
    let books = Books::new();
    books
        .cmd(&["view-recent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found"));
}

#[test]
fn negative_and_zero_amounts_are_rejected() {
    let books = Books::new();
    for amount in ["-5", "0"] {
        books
            .cmd(&["add", "--amount", amount, "--type", "expense", "--category", "Food"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Amount must be a positive number."));
    }

    books
        .cmd(&["view-recent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found"));
}

#[test]
fn unknown_type_is_a_usage_error() {
    let books = Books::new();
    books
        .cmd(&["add", "--amount", "5", "--type", "gift", "--category", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn monthly_summary() {
    let books = Books::new();
    books
        .cmd(&[
            "add", "--amount", "100", "--type", "income", "--category", "Salary", "--date",
            "2024-03-01",
        ])
        .assert()
        .success();
    books
        .cmd(&[
            "add", "--amount", "40", "--type", "expense", "--category", "Food", "--date",
            "2024-03-18",
        ])
        .assert()
        .success();

    books
        .cmd(&["summary", "--month", "3", "--year", "2024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Financial Summary for 3/2024"))
        .stdout(predicate::str::contains("Total Income:   $100.00"))
        .stdout(predicate::str::contains("Total Expenses: $40.00"))
        .stdout(predicate::str::contains("Net Balance:    $60.00"));
}

#[test]
fn summary_month_out_of_range() {
    let books = Books::new();
    books
        .cmd(&["summary", "--month", "13", "--year", "2024"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Month must be between 1 and 12."));
}

#[test]
fn update_and_delete() {
    let books = Books::new();
    books
        .cmd(&["add", "--amount", "12", "--type", "expense", "--category", "Food"])
        .assert()
        .success();

    books
        .cmd(&["update", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least one field"));

    books
        .cmd(&["update", "1", "--desc", "groceries"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transaction with ID 1 updated successfully."));

    books
        .cmd(&["view-recent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$   12.00 (Food) - groceries"));

    books
        .cmd(&["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transaction with ID 1 deleted successfully."));

    books
        .cmd(&["delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transaction with ID 1 not found."));
}

#[test]
fn update_unknown_id() {
    let books = Books::new();
    books
        .cmd(&["update", "9", "--amount", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Transaction with ID 9 not found."));
}

#[test]
fn budget_status() {
    let books = Books::new();
    books
        .cmd(&[
            "add", "--amount", "50", "--type", "expense", "--category", "Food", "--date",
            "2024-03-10",
        ])
        .assert()
        .success();

    books
        .cmd(&[
            "budget", "--category", "Food", "--limit", "200", "--month", "3", "--year", "2024",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget of $200.00 set for 'Food' (3/2024)."))
        .stdout(predicate::str::contains("Budget Limit:   $200.00"))
        .stdout(predicate::str::contains("Total Spent:    $50.00"))
        .stdout(predicate::str::contains("Remaining:      $150.00"))
        .stdout(predicate::str::contains("You are still within your budget."));

    books
        .cmd(&[
            "budget", "--category", "Food", "--limit", "30", "--month", "3", "--year", "2024",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated to $30.00"))
        .stdout(predicate::str::contains(
            "Warning: You have exceeded your budget by $20.00!",
        ));
}

#[test]
fn categories_are_reused() {
    let books = Books::new();
    for _ in 0..2 {
        books
            .cmd(&["add", "--amount", "1", "--type", "expense", "--category", "Food"])
            .assert()
            .success();
    }

    let output = books.cmd(&["categories"]).assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout.matches("Food").count(), 1);
    assert!(stdout.contains("Food                     2"));
}

#[test]
fn db_path_from_environment() {
    let books = Books::new();
    let mut cmd = Command::cargo_bin("fintrack").unwrap();
    cmd.env("FINTRACK_DB", &books.db)
        .args(["add", "--amount", "3", "--type", "income", "--category", "Gifts"])
        .assert()
        .success();
    assert!(books.db.exists());
}

#[test]
fn confirmations_use_stored_category_spelling() {
    let books = Books::new();
    books
        .cmd(&["add", "--amount", "5", "--type", "expense", "--category", "Food"])
        .assert()
        .success();
    books
        .cmd(&["add", "--amount", "7", "--type", "expense", "--category", "FOOD"])
        .assert()
        .success()
        .stdout(predicate::str::contains("of $7.00 for 'Food'"));
    books
        .cmd(&[
            "budget", "--category", "food", "--limit", "20", "--month", "1", "--year", "2024",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("set for 'Food' (1/2024)"))
        .stdout(predicate::str::contains("Budget Status for Food"));
}

#[test]
fn summary_overflow_fails_cleanly() {
    let books = Books::new();
    let max = "79228162514337593543950335";
    for _ in 0..2 {
        books
            .cmd(&[
                "add", "--amount", max, "--type", "income", "--category", "Lottery", "--date",
                "2024-03-01",
            ])
            .assert()
            .success();
    }
    books
        .cmd(&["summary", "--month", "3", "--year", "2024"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("too large"));
}
