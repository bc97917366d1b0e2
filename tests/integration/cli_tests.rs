//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("unused-styles").expect("Binary should be built");
    cmd.env("NO_COLOR", "1");
    cmd
}

fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (relative, content) in files {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn json_output(args: &[&str], root: &Path) -> serde_json::Value {
    let output = cli()
        .arg(root)
        .args(["--format", "json", "--quiet"])
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "CLI failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--stylesheet"))
        .stdout(predicate::str::contains("--watch"));
}

#[test]
fn test_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_project_fails() {
    let dir = TempDir::new().unwrap();
    cli()
        .arg(dir.path().join("does-not-exist"))
        .assert()
        .failure();
}

// ============================================================================
// Terminal output
// ============================================================================

#[test]
fn test_fixture_terminal_report() {
    let root = fixtures_path().join("react-app");
    cli()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 unused class selectors"))
        .stdout(predicate::str::contains("Class \".never-used\" is not used in project"))
        .stdout(predicate::str::contains("Class \".button.primary\" is not used in project"))
        .stdout(predicate::str::contains("Class \".header\"").not());
}

#[test]
fn test_clean_project() {
    let dir = project(&[
        ("src/index.css", ".card { }\n.card:hover { }\n"),
        ("src/Card.jsx", "<div className=\"card\" />"),
    ]);
    cli()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No unused styles found"));
}

#[test]
fn test_no_stylesheet_is_not_an_error() {
    let dir = project(&[("src/App.tsx", "export {};")]);
    cli()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No stylesheet found"));
}

#[test]
fn test_malformed_stylesheet_is_reported_not_fatal() {
    let dir = project(&[("src/index.css", ".a {\n")]);
    cli()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not analyze stylesheet"))
        .stdout(predicate::str::contains("Unclosed block"));
}

// ============================================================================
// JSON output and overrides
// ============================================================================

#[test]
fn test_fixture_json_report() {
    let root = fixtures_path().join("react-app");
    let value = json_output(&[], &root);

    assert_eq!(value["status"], "analyzed");
    assert_eq!(value["total_issues"], 4);
    let names: Vec<_> = value["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["class_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["button.primary", "orphan", "never-used", "mobile-only"]);
}

#[test]
fn test_json_written_to_file() {
    let dir = project(&[("src/index.css", ".ghost { }")]);
    let report = dir.path().join("report.json");

    cli()
        .arg(dir.path())
        .args(["--format", "json", "--output"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(value["issues"][0]["message"], "Class \".ghost\" is not used in project");
}

#[test]
fn test_stylesheet_override() {
    let dir = project(&[
        ("src/index.css", ".default { }"),
        ("styles/app.scss", ".custom { .nested { } }"),
        ("src/App.tsx", "nested"),
    ]);

    let value = json_output(&["--stylesheet", "styles/app.scss"], dir.path());
    assert_eq!(value["total_issues"], 1);
    assert_eq!(value["issues"][0]["class_name"], "custom");
}

#[test]
fn test_exclude_flag_extends_defaults() {
    let dir = project(&[
        ("src/index.css", ".modal { }\n.toast { }\n"),
        ("vendor/lib.js", "modal"),
        ("node_modules/x/index.js", "toast"),
    ]);

    let value = json_output(&[], dir.path());
    assert_eq!(value["total_issues"], 1);

    let value = json_output(&["--exclude", "vendor"], dir.path());
    assert_eq!(value["total_issues"], 2);
}

#[test]
fn test_config_file_is_loaded() {
    let dir = project(&[
        ("styles/main.css", ".from-config { }"),
        (".unused-styles.yml", "stylesheets:\n  - styles/main.css\n"),
    ]);

    let value = json_output(&["--no-parallel"], dir.path());
    assert_eq!(value["issues"][0]["class_name"], "from-config");
}
