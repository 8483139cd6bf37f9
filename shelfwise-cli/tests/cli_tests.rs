//! Integration tests for the Shelfwise CLI

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// A command bound to a temporary data directory and a signed-in user
fn shelfwise(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shelfwise-cli").unwrap();
    cmd.env_remove("SHELFWISE_USER")
        .env_remove("SHELFWISE_DATA_DIR")
        .arg("--data-dir")
        .arg(dir.path())
        .args(["--user", "reader-1"]);
    cmd
}

fn add_dune(dir: &TempDir) {
    shelfwise(dir)
        .args([
            "add",
            "/works/OL893415W",
            "--title",
            "Dune",
            "--author",
            "Frank Herbert",
            "--pages",
            "412",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added to To Read"));
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("shelfwise-cli").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("progress"))
        .stdout(predicate::str::contains("reconcile"))
        .stdout(predicate::str::contains("subject"))
        .stdout(predicate::str::contains("author"));
}

#[test]
fn test_author_help() {
    let mut cmd = Command::cargo_bin("shelfwise-cli").unwrap();
    cmd.args(["author", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Show an author and their works"))
        .stdout(predicate::str::contains("--limit"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("shelfwise-cli").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("shelfwise"));
}

#[test]
fn test_progress_help() {
    let mut cmd = Command::cargo_bin("shelfwise-cli").unwrap();
    cmd.args(["progress", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Record the current page"))
        .stdout(predicate::str::contains("--total"));
}

#[test]
fn test_requires_user() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("shelfwise-cli").unwrap();
    cmd.env_remove("SHELFWISE_USER")
        .arg("--data-dir")
        .arg(dir.path())
        .args(["add", "OL1W", "--title", "Dune"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not authenticated"));
}

#[test]
fn test_invalid_user() {
    let dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("shelfwise-cli").unwrap();
    cmd.arg("--data-dir")
        .arg(dir.path())
        .args(["--user", "../other", "stats"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --user"));
}

#[test]
fn test_add_writes_document() {
    let dir = TempDir::new().unwrap();
    add_dune(&dir);

    let path = dir
        .path()
        .join("users/reader-1/readBooks/OL893415W.json");
    assert!(path.exists());

    let record: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(record["key"], "OL893415W");
    assert_eq!(record["numberOfPages"], 412);
    assert!(record.get("currentPage").is_none());
}

#[test]
fn test_list_json() {
    let dir = TempDir::new().unwrap();
    add_dune(&dir);

    let output = shelfwise(&dir)
        .args(["list", "to-read", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["title"], "Dune");
    assert_eq!(records[0]["authors"][0]["name"], "Frank Herbert");
}

#[test]
fn test_list_empty_and_unknown_collection() {
    let dir = TempDir::new().unwrap();

    shelfwise(&dir)
        .args(["list", "bookshelf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookshelf is empty"));

    shelfwise(&dir)
        .args(["list", "wishlist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown collection"));
}

#[test]
fn test_start_from_queue() {
    let dir = TempDir::new().unwrap();
    add_dune(&dir);

    shelfwise(&dir)
        .args(["start", "OL893415W"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Now reading"));

    shelfwise(&dir)
        .args(["list", "to-read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("To Read is empty"));

    shelfwise(&dir)
        .args(["list", "currently-reading"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 / 412 pages (0%)"));
}

#[test]
fn test_progress_rejects_bad_page() {
    let dir = TempDir::new().unwrap();
    add_dune(&dir);
    shelfwise(&dir).args(["start", "OL893415W"]).assert().success();

    shelfwise(&dir)
        .args(["progress", "OL893415W", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid page number"));

    shelfwise(&dir)
        .args(["progress", "OL404W", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_reading_to_completion() {
    let dir = TempDir::new().unwrap();
    add_dune(&dir);
    shelfwise(&dir).args(["start", "OL893415W"]).assert().success();

    shelfwise(&dir)
        .args(["progress", "OL893415W", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("200 / 412 pages (48%)"));

    shelfwise(&dir)
        .args(["latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune by Frank Herbert"));

    shelfwise(&dir)
        .args(["reconcile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Still reading OL893415W"));

    shelfwise(&dir)
        .args(["progress", "OL893415W", "412"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moved to the bookshelf"));

    let output = shelfwise(&dir).args(["stats", "--json"]).output().unwrap();
    let stats: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["toRead"], 0);
    assert_eq!(stats["currentlyReading"], 0);
    assert_eq!(stats["finished"], 1);

    shelfwise(&dir)
        .args(["reconcile"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing is being read"));
}

#[test]
fn test_progress_total_override() {
    let dir = TempDir::new().unwrap();
    shelfwise(&dir)
        .args(["start", "OL1W", "--title", "Untitled Draft"])
        .assert()
        .success();

    shelfwise(&dir)
        .args(["progress", "OL1W", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30 pages read"));

    shelfwise(&dir)
        .args(["progress", "OL1W", "30", "--total", "60"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30 / 60 pages (50%)"));
}

#[test]
fn test_remove() {
    let dir = TempDir::new().unwrap();
    shelfwise(&dir)
        .args(["shelve", "OL2W", "--title", "Emma"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shelved"));

    shelfwise(&dir)
        .args(["remove", "shelf", "OL2W"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed OL2W from Bookshelf"));

    assert!(!dir.path().join("users/reader-1/bookshelf/OL2W.json").exists());
}

#[test]
fn test_start_with_details_shows_cover() {
    let dir = TempDir::new().unwrap();
    shelfwise(&dir)
        .args([
            "start",
            "OL7W",
            "--title",
            "Emma",
            "--author",
            "Jane Austen",
            "--cover",
            "42",
        ])
        .assert()
        .success();

    shelfwise(&dir)
        .args(["latest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Emma by Jane Austen"))
        .stdout(predicate::str::contains(
            "Cover: https://covers.openlibrary.org/b/id/42-M.jpg",
        ));
}

#[test]
fn test_start_with_author_does_not_promote_queued_copy() {
    let dir = TempDir::new().unwrap();
    add_dune(&dir);

    // Nothing listens here, so the catalog lookup fails instead of the
    // queued copy being promoted without the extra details.
    shelfwise(&dir)
        .args(["--catalog-url", "http://127.0.0.1:9"])
        .args(["start", "OL893415W", "--author", "Brian Herbert", "--cover", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Catalog lookup for OL893415W failed"));

    shelfwise(&dir)
        .args(["list", "to-read"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dune"));
}
