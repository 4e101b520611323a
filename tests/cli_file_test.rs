//! Integration tests for project file handling via CLI.
//!
//! These tests verify that:
//! - `tt file new/open/recent/show` create, switch and report project files
//! - `--file` and `TT_DATA_FILE` override the configured file
//! - Commands fail cleanly when no file is selected or the file is broken
//! - Sync-conflict copies are reported

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

// === File New/Open ===

#[test]
fn test_file_new_creates_empty_document() {
    let env = TestEnv::new();

    env.tt()
        .args(["file", "new"])
        .arg(env.data_file())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":true"));

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(env.data_file()).unwrap()).unwrap();
    assert_eq!(doc["version"], 1);
    assert_eq!(doc["projects"], serde_json::json!([]));
}

#[test]
fn test_file_new_refuses_to_overwrite() {
    let env = TestEnv::init();
    env.add_project("Thesis");

    env.tt()
        .args(["file", "new"])
        .arg(env.data_file())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let content = fs::read_to_string(env.data_file()).unwrap();
    assert!(content.contains("Thesis"));
}

#[test]
fn test_file_open_missing_file() {
    let env = TestEnv::new();
    let path = env.sync_path().join("Nope.json");

    env.tt()
        .args(["file", "open"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    env.tt()
        .args(["file", "open", "--create"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"created\":true"));
    assert!(path.exists());
}

#[test]
fn test_file_open_switches_current_file() {
    let env = TestEnv::init();
    env.add_project("First file project");

    let other = env.sync_path().join("Other.json");
    env.tt().args(["file", "new"]).arg(&other).assert().success();
    env.tt()
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":0"));

    env.tt()
        .args(["file", "open"])
        .arg(env.data_file())
        .assert()
        .success();
    env.tt()
        .args(["project", "list", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First file project"));
}

#[test]
fn test_file_recent_lists_most_recent_first() {
    let env = TestEnv::init();
    let other = env.sync_path().join("Other.json");
    env.tt().args(["file", "new"]).arg(&other).assert().success();

    let recent = env.json(&["file", "recent"]);
    assert_eq!(recent["count"], 2);
    assert!(recent["files"][0]["path"].as_str().unwrap().ends_with("Other.json"));
    assert_eq!(recent["files"][0]["current"], true);
    assert_eq!(recent["files"][1]["current"], false);
}

// === Resolution ===

#[test]
fn test_no_file_selected() {
    let env = TestEnv::new();

    env.tt()
        .args(["project", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project file selected"));
}

#[test]
fn test_no_file_selected_human_error() {
    let env = TestEnv::new();

    env.tt()
        .args(["status", "-H"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: No project file selected"));
}

#[test]
fn test_file_flag_and_env_override_config() {
    let env = TestEnv::init();
    let other = env.sync_path().join("Other.json");
    env.tt()
        .args(["file", "open", "--create"])
        .arg(&other)
        .assert()
        .success();
    env.tt()
        .args(["file", "open"])
        .arg(env.data_file())
        .assert()
        .success();

    env.tt()
        .args(["file", "show", "--file"])
        .arg(&other)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\":\"cli\""))
        .stdout(predicate::str::contains("Other.json"));

    env.tt()
        .args(["file", "show"])
        .env("TT_DATA_FILE", &other)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\":\"env:TT_DATA_FILE\""));

    env.tt()
        .args(["file", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\":\"config\""))
        .stdout(predicate::str::contains("ThesisTracker.json"));
}

// === Loading ===

#[test]
fn test_unparseable_file_is_reported_and_left_alone() {
    let env = TestEnv::init();
    fs::write(env.data_file(), "{ definitely not json").unwrap();

    env.tt()
        .args(["project", "add", "Thesis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));

    assert_eq!(
        fs::read_to_string(env.data_file()).unwrap(),
        "{ definitely not json"
    );
}

#[test]
fn test_legacy_file_gets_ids_and_defaults() {
    let env = TestEnv::init();
    fs::write(
        env.data_file(),
        r#"{"projects": [{"name": "Old", "tasks": [{"title": "Kept", "due_date": "2026-11-01", "completed": false}, {}]}, {}]}"#,
    )
    .unwrap();

    let list = env.json(&["project", "list"]);
    assert_eq!(list["count"], 2);
    assert_eq!(list["projects"][0]["name"], "Old");
    assert_eq!(list["projects"][0]["active"], 2);
    assert_eq!(list["projects"][1]["name"], "Untitled");

    // IDs written back on open stay the same on the next run.
    let again = env.json(&["project", "list"]);
    assert_eq!(list["projects"][0]["id"], again["projects"][0]["id"]);

    env.tt()
        .args(["view", "active", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Untitled Task"))
        .stdout(predicate::str::contains("Kept  due 2026-11-01"));
}

#[test]
fn test_newer_document_version_rejected() {
    let env = TestEnv::init();
    fs::write(env.data_file(), r#"{"version": 99, "projects": []}"#).unwrap();

    env.tt()
        .args(["status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported document version 99"));
}

// === Conflicts ===

#[test]
fn test_status_warns_about_conflict_copies() {
    let env = TestEnv::init();
    fs::write(
        env.sync_path().join("ThesisTracker (conflicted copy 2026-10-01).json"),
        r#"{"projects": []}"#,
    )
    .unwrap();
    fs::write(env.sync_path().join("Unrelated.json"), "{}").unwrap();

    let status = env.json(&["status"]);
    let conflicts = status["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].as_str().unwrap().contains("conflicted copy"));

    env.tt()
        .args(["status", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sync-conflict"));

    env.tt()
        .args(["doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"healthy\":false"));
}

#[test]
fn test_doctor_healthy_file() {
    let env = TestEnv::init();
    env.add_project("Thesis");

    env.tt()
        .args(["doctor", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No problems found."));
}
