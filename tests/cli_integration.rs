//! Integration tests for the pursuit CLI
//!
//! Every test runs the real binary against a fresh database in a temp dir.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const TODAY: &str = "2023-05-20";

/// Run pursuit with its database and config isolated under `dir`
fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .args(args)
        .args(["--today", TODAY])
        .env("PURSUIT_DB_PATH", dir.join("pursuit.db"))
        .env("PURSUIT_CONFIG", dir.join("config.toml"))
        .env_remove("PURSUIT_LOG")
        .output()
        .expect("Failed to execute pursuit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn ok(dir: &Path, args: &[&str]) -> String {
    let output = run(dir, args);
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        stderr(&output)
    );
    stdout(&output)
}

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .arg("--help")
        .output()
        .expect("Failed to execute");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Job search tracker"));
}

#[test]
fn test_init_seeds_every_collection() {
    let dir = TempDir::new().unwrap();
    let out = ok(dir.path(), &["init"]);
    assert!(out.contains("Database initialized at"));
    assert!(out.contains("Partition: local"));
    for key in ["applications", "categories", "contacts", "reflection", "target-companies", "tasks"] {
        assert!(out.contains(key), "missing key {} in:\n{}", key, out);
    }
}

#[test]
fn test_company_score_and_top_list() {
    let dir = TempDir::new().unwrap();
    let out = ok(
        dir.path(),
        &["company", "add", "Stripe", "-m", "4", "-p", "2", "-s", "4", "-v", "4", "-a", "Y"],
    );
    assert!(out.contains("with score 18/18"), "{}", out);

    let top = ok(dir.path(), &["company", "top"]);
    let mckinsey = top.find("McKinsey").unwrap();
    let stripe = top.find("Stripe").unwrap();
    assert!(mckinsey < stripe, "ties keep insertion order:\n{}", top);
    assert!(!top.contains("BCG"));
}

#[test]
fn test_out_of_range_attribute_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = run(
        dir.path(),
        &["company", "add", "Stripe", "-m", "4", "-p", "3", "-s", "4", "-v", "4"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("posting must be between 0 and 2, got 3"));

    let list = ok(dir.path(), &["company", "list"]);
    assert!(!list.contains("Stripe"));
}

#[test]
fn test_application_detail_shows_target_score() {
    let dir = TempDir::new().unwrap();
    let out = ok(dir.path(), &["app", "add", "bain", "Associate Consultant"]);
    assert!(out.contains("Added application #6"));

    let show = ok(dir.path(), &["app", "show", "6"]);
    assert!(show.contains("Date: 2023-05-20"));
    assert!(show.contains("Target company score: 11/18 (61%)"), "{}", show);

    let other = ok(dir.path(), &["app", "show", "1"]);
    assert!(other.contains("Not on your target company list."));
}

#[test]
fn test_application_edit_keeps_unset_fields() {
    let dir = TempDir::new().unwrap();
    let out = ok(
        dir.path(),
        &["app", "edit", "2", "--position", "Senior Software Engineer", "--link", ""],
    );
    assert!(out.contains("Updated application #2."));

    let show = ok(dir.path(), &["app", "show", "2"]);
    assert!(show.contains("Company: Microsoft"));
    assert!(show.contains("Position: Senior Software Engineer"));
    assert!(show.contains("Status: Applied"));
    assert!(!show.contains("Link:"), "{}", show);

    let blank = run(dir.path(), &["app", "edit", "2", "--company", " "]);
    assert!(!blank.status.success());
    assert!(stderr(&blank).contains("cannot add empty company"));
}

#[test]
fn test_contact_edit_updates_listing() {
    let dir = TempDir::new().unwrap();
    ok(dir.path(), &["contact", "edit", "2", "--company", "Stripe", "--position", "Head of Product"]);

    let list = ok(dir.path(), &["contact", "list", "-s", "stripe"]);
    assert!(list.contains("Jane Doe"));
    assert!(list.contains("Head of Product"));
    assert!(list.contains("Follow-up"), "{}", list);
    assert!(!list.contains("John Smith"));
}

#[test]
fn test_task_list_filters_by_priority_and_completion() {
    let dir = TempDir::new().unwrap();
    let high = ok(dir.path(), &["task", "list", "--priority", "high"]);
    assert!(high.contains("Update resume"));
    assert!(high.contains("Practice coding"));
    assert!(!high.contains("Research Company X"));

    let done = ok(dir.path(), &["task", "list", "--completed", "completed"]);
    assert!(done.contains("Set up job search alerts"));
    assert!(!done.contains("Update resume"));

    let open = ok(dir.path(), &["task", "list", "--completed", "incomplete"]);
    assert!(open.contains("Update resume"));
    assert!(!open.contains("Set up job search alerts"));
}

#[test]
fn test_unknown_status_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["app", "status", "1", "Ghosted"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("unknown application status 'Ghosted'"));
}

#[test]
fn test_sort_preference_is_remembered() {
    let dir = TempDir::new().unwrap();
    let first = ok(dir.path(), &["app", "list", "--sort", "company"]);
    assert!(first.find("Amazon").unwrap() < first.find("Microsoft").unwrap());

    let again = ok(dir.path(), &["app", "list"]);
    assert!(again.find("Amazon").unwrap() < again.find("Microsoft").unwrap());

    let flipped = ok(dir.path(), &["app", "list", "--sort", "company"]);
    assert!(flipped.find("Microsoft").unwrap() < flipped.find("Amazon").unwrap());

    let reset = ok(dir.path(), &["app", "list", "--reset-sort"]);
    assert!(reset.find("Google").unwrap() < reset.find("Apple").unwrap());
}

#[test]
fn test_task_toggle_keeps_status_in_sync() {
    let dir = TempDir::new().unwrap();
    assert!(ok(dir.path(), &["task", "done", "1"]).contains("is now Completed"));
    assert!(ok(dir.path(), &["task", "done", "1"]).contains("is now In Progress"));
}

#[test]
fn test_task_requires_known_category() {
    let dir = TempDir::new().unwrap();
    let output = run(
        dir.path(),
        &["task", "add", "Update portfolio", "--due", "2023-05-21", "-c", "Hobbies"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("category 'Hobbies' not found"));
}

#[test]
fn test_other_category_is_protected() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["category", "rm", "Other"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("category 'Other' is protected"));
}

#[test]
fn test_dashboard_summarizes_seed_data() {
    let dir = TempDir::new().unwrap();
    let out = ok(dir.path(), &["dashboard"]);
    assert!(out.contains("Dashboard for 2023-05-20"));
    assert!(out.contains("Applications (5):"));
    assert!(out.contains("McKinsey"));
    assert!(out.contains("Reflection:"));
}

#[test]
fn test_reflection_tags_and_sections() {
    let dir = TempDir::new().unwrap();
    ok(dir.path(), &["reflect", "tag", "add", "strengths", "Persistence"]);
    ok(dir.path(), &["reflect", "section", "goals", "Lead a product team"]);

    let show = ok(dir.path(), &["reflect", "show"]);
    assert!(show.contains("Persistence"));
    assert!(show.contains("Lead a product team"));

    let blank = run(dir.path(), &["reflect", "tag", "add", "values", "  "]);
    assert!(!blank.status.success());
    assert!(stderr(&blank).contains("cannot add empty tag"));
}

#[test]
fn test_section_editing_mark_is_toggled_and_cleared_on_save() {
    let dir = TempDir::new().unwrap();
    assert!(ok(dir.path(), &["reflect", "edit", "goals"]).contains("Editing section"));
    assert!(ok(dir.path(), &["reflect", "show"]).contains("[editing]"));

    ok(dir.path(), &["reflect", "section", "goals", "Lead a product team"]);
    assert!(!ok(dir.path(), &["reflect", "show"]).contains("[editing]"));

    ok(dir.path(), &["reflect", "edit", "goals"]);
    assert!(ok(dir.path(), &["reflect", "edit", "goals"]).contains("Stopped editing"));
}

#[test]
fn test_invalid_today_is_rejected() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_pursuit"))
        .args(["dashboard", "--today", "20-05-2023"])
        .env("PURSUIT_DB_PATH", dir.path().join("pursuit.db"))
        .env("PURSUIT_CONFIG", dir.path().join("config.toml"))
        .output()
        .expect("Failed to execute");
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid date '20-05-2023'"));
}
