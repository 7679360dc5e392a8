//! Integration tests for the bookpace binary.
//!
//! These tests verify end-to-end behavior including:
//! - Adding books and listing progress
//! - Progress updates and the finish transition
//! - History summary and CSV export
//! - Data persistence across invocations

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("bookpace"))
}

fn add_book(data_dir: &std::path::Path, title: &str, pages: &str) {
    cli()
        .arg("add")
        .arg(title)
        .arg("--pages")
        .arg(pages)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Reading progress tracker with completion estimates",
        ));
}

#[test]
fn test_add_creates_shelf_and_log() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("add")
        .arg("Dune")
        .arg("--pages")
        .arg("300")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'Dune'"))
        .stdout(predicate::str::contains("Estimated completion:"));

    assert!(data_dir.join("shelf.json").exists());
    assert!(data_dir.join("progress.log").exists());
}

#[test]
fn test_add_rejects_zero_pages() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add")
        .arg("Empty")
        .arg("--pages")
        .arg("0")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_list_shows_progress() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"))
        .stdout(predicate::str::contains("Page 0 of 300"))
        .stdout(predicate::str::contains("Daily"));
}

#[test]
fn test_list_empty_shelf() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No books in progress"));
}

#[test]
fn test_update_persists_across_invocations() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("update")
        .arg("Dune")
        .arg("--page")
        .arg("120")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("page 120 of 300"));

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 120 of 300"));
}

#[test]
fn test_update_rejects_out_of_range_page() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("update")
        .arg("Dune")
        .arg("--page")
        .arg("301")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_update_to_last_page_with_finish_flag() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("update")
        .arg("Dune")
        .arg("--page")
        .arg("300")
        .arg("--finish")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished 'Dune'"));

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Books completed: 1"));
}

#[test]
fn test_update_to_last_page_declining_prompt_keeps_book_open() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("update")
        .arg("Dune")
        .arg("--page")
        .arg("300")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mark as finished?"));

    // Still in progress
    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Page 300 of 300"));
}

#[test]
fn test_finish_is_one_way() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("finish")
        .arg("Dune")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Finished 'Dune'"));

    // Finishing again must fail
    cli()
        .arg("finish")
        .arg("Dune")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_history_empty() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No completed books yet"));
}

#[test]
fn test_history_shows_variance() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("finish")
        .arg("Dune")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Books completed: 1"))
        .stdout(predicate::str::contains("Avg. days from estimate:"))
        .stdout(predicate::str::contains("Dune: finished"));
}

#[test]
fn test_export_writes_archive() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("finish")
        .arg("Dune")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("export")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 finished books"));

    let archive = temp_dir.path().join("completed.csv");
    assert!(archive.exists());
    let contents = std::fs::read_to_string(archive).unwrap();
    assert!(contents.contains("Dune"));
    assert!(contents.contains("days_from_estimate"));
}

#[test]
fn test_remove_book() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("remove")
        .arg("Dune")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'Dune'"));

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No books in progress"));
}

#[test]
fn test_unknown_title_fails() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("update")
        .arg("Hyperion")
        .arg("--page")
        .arg("10")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_ambiguous_title_prefix_fails() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune Messiah", "330");
    add_book(temp_dir.path(), "Dune Emperor", "410");

    cli()
        .arg("update")
        .arg("Dune")
        .arg("--page")
        .arg("10")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();
}

#[test]
fn test_pace_change_reprojects() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    cli()
        .arg("pace")
        .arg("Dune")
        .arg("--pages-per-day")
        .arg("50")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("50 pages/day"));
}

#[test]
fn test_work_cadence_accepted() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("add")
        .arg("Dune")
        .arg("--pages")
        .arg("300")
        .arg("--cadence")
        .arg("work")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Work (Mon-Thu)"));
}

#[test]
fn test_progress_log_accumulates_events() {
    let temp_dir = setup_test_dir();
    add_book(temp_dir.path(), "Dune", "300");

    for page in ["50", "100"] {
        cli()
            .arg("update")
            .arg("Dune")
            .arg("--page")
            .arg(page)
            .arg("--data-dir")
            .arg(temp_dir.path())
            .assert()
            .success();
    }

    let log = std::fs::read_to_string(temp_dir.path().join("progress.log")).unwrap();
    // One event for the add plus one per update
    assert_eq!(log.lines().count(), 3);
    let last: serde_json::Value = serde_json::from_str(log.lines().last().unwrap()).unwrap();
    assert_eq!(last["page"], 100);
}
