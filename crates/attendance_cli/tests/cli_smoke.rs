//! End-to-end checks for the `attendance` binary.
//!
//! Every test works on its own temporary database and log directory.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// `attendance` command logged in against a database inside `dir`.
fn attendance(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("attendance").unwrap();
    cmd.env("ATTENDANCE_DB_PATH", dir.join("attendance.db"))
        .env("ATTENDANCE_LOG_DIR", dir.join("logs"))
        .env("ATTENDANCE_USER", "admin")
        .env("ATTENDANCE_PASSWORD", "admin");
    cmd
}

fn seed_two_students(dir: &Path) {
    attendance(dir)
        .args(["student", "add", "--name", "Asha", "--roll", "1"])
        .assert()
        .success();
    attendance(dir)
        .args(["student", "add", "--name", "Bilal", "--roll", "2"])
        .assert()
        .success();
}

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("attendance")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("student"))
        .stdout(predicate::str::contains("export"));
}

#[test]
fn wrong_credentials_are_rejected() {
    let dir = TempDir::new().unwrap();
    attendance(dir.path())
        .env("ATTENDANCE_PASSWORD", "wrong")
        .args(["student", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("login failed"));
    assert!(!dir.path().join("attendance.db").exists());
}

#[test]
fn add_and_list_students() {
    let dir = TempDir::new().unwrap();
    seed_two_students(dir.path());

    attendance(dir.path())
        .args(["student", "list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Asha\""))
        .stdout(predicate::str::contains("\"roll_number\": \"2\""));
}

#[test]
fn duplicate_roll_number_fails() {
    let dir = TempDir::new().unwrap();
    seed_two_students(dir.path());

    attendance(dir.path())
        .args(["student", "add", "--name", "Chen", "--roll", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("roll number already exists: 1"));
}

#[test]
fn class_marking_feeds_date_and_summary_reports() {
    let dir = TempDir::new().unwrap();
    seed_two_students(dir.path());

    attendance(dir.path())
        .args(["attendance", "class", "--date", "2024-01-10", "--absent", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 present, 1 absent"));

    attendance(dir.path())
        .args(["report", "date", "--date", "2024-01-10", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"Present\""))
        .stdout(predicate::str::contains("\"status\": \"Absent\""));

    attendance(dir.path())
        .args([
            "report",
            "summary",
            "--from",
            "2024-01-10",
            "--to",
            "2024-01-10",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("100.00%"))
        .stdout(predicate::str::contains("0.00%"));
}

#[test]
fn invalid_date_is_rejected() {
    let dir = TempDir::new().unwrap();
    seed_two_students(dir.path());

    attendance(dir.path())
        .args(["attendance", "mark", "1", "present", "--date", "2024-13-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("2024-13-01"));
}

#[test]
fn export_writes_csv_and_rejects_empty_tables() {
    let dir = TempDir::new().unwrap();
    let empty_path = dir.path().join("empty.csv");

    attendance(dir.path())
        .args(["export", "students", "--output"])
        .arg(&empty_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no rows"));
    assert!(!empty_path.exists());

    seed_two_students(dir.path());
    let csv_path = dir.path().join("students.csv");
    attendance(dir.path())
        .args(["export", "students", "--output"])
        .arg(&csv_path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert!(content.starts_with("id,name,roll_number,section\n1,Asha,1,\n"));
}
