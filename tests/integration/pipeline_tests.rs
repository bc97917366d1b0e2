//! Integration tests for the unused-styles analysis pipeline
//!
//! These tests build throwaway projects on disk and run the full
//! resolve → parse → extract → scan → match → diagnose pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use unused_styles::analysis::{AnalysisOutcome, Analyzer, Finding, Position, Severity};
use unused_styles::config::Config;
use unused_styles::parser::StylesheetError;
use unused_styles::store::FindingStore;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Create a project with the given files, paths relative to its root
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (relative, content) in files {
        let path = dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    dir
}

fn analyze(root: &Path) -> AnalysisOutcome {
    Analyzer::new(Config::default())
        .analyze(root)
        .expect("Analysis should not fail")
}

fn class_names(findings: &[Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.class_name.as_str()).collect()
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_pseudo_rule_shares_the_used_token() {
    let dir = project(&[
        ("src/index.css", ".card { } .card:hover { }"),
        ("src/Card.tsx", "export const Card = () => <div className=\"card\" />;"),
    ]);

    let outcome = analyze(dir.path());
    assert!(
        outcome.findings().is_empty(),
        "Both .card rules should count as used, got {:?}",
        outcome.findings()
    );
}

#[test]
fn test_unused_class_is_reported_at_its_rule() {
    let dir = project(&[
        ("src/index.css", ".unused-class { }"),
        ("src/App.jsx", "export default function App() { return null; }"),
    ]);

    let outcome = analyze(dir.path());
    let findings = outcome.findings();
    assert_eq!(findings.len(), 1);

    let finding = &findings[0];
    assert_eq!(finding.class_name, "unused-class");
    assert_eq!(finding.message, "Class \".unused-class\" is not used in project");
    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(finding.range.start, Position { line: 0, col: 0 });
    assert_eq!(finding.range.end, Position { line: 0, col: 13 });
    assert_eq!(finding.stylesheet, dir.path().join("src/index.css"));
}

#[test]
fn test_compound_selector_is_reported_even_when_parts_are_used() {
    // `a.b` is looked up by its full name, which never enters the used set
    let dir = project(&[
        ("src/index.css", ".a.b { }"),
        ("src/main.ts", "const a = 1;\nconst b = a + 1;\n"),
    ]);

    let outcome = analyze(dir.path());
    assert_eq!(class_names(outcome.findings()), vec!["a.b"]);
}

#[test]
fn test_no_stylesheet_yields_nothing() {
    let dir = project(&[("src/App.tsx", "export {};")]);

    let outcome = analyze(dir.path());
    assert!(matches!(outcome, AnalysisOutcome::NoStylesheet));
    assert!(outcome.findings().is_empty());
}

// ============================================================================
// Matching rules
// ============================================================================

#[test]
fn test_whole_word_matching() {
    let dir = project(&[
        ("src/index.css", ".btn { }\n.icon { }\n"),
        ("src/Button.tsx", "<i className=\"btn-icon\" />"),
    ]);
    assert_eq!(class_names(analyze(dir.path()).findings()), vec!["btn", "icon"]);

    fs::write(dir.path().join("src/Button.tsx"), "const btn = <i className=\"icon\" />;").unwrap();
    assert!(analyze(dir.path()).findings().is_empty());
}

#[test]
fn test_usage_in_excluded_directory_does_not_count() {
    let dir = project(&[
        ("src/index.css", ".card { }\n.modal { }\n"),
        ("src/App.tsx", "<div className=\"card\" />"),
        ("node_modules/ui/index.js", "export const modal = 'modal';"),
        ("dist/bundle.js", "modal"),
        (".next/server/page.js", "modal"),
    ]);

    let outcome = analyze(dir.path());
    assert_eq!(class_names(outcome.findings()), vec!["modal"]);
}

#[test]
fn test_configured_exclusions_replace_defaults() {
    let dir = project(&[
        ("src/index.css", ".modal { }"),
        ("generated/styles.js", "modal"),
    ]);

    let config = Config {
        exclude_dirs: vec!["generated".to_string()],
        ..Config::default()
    };
    let outcome = Analyzer::new(config).analyze(dir.path()).unwrap();
    assert_eq!(class_names(outcome.findings()), vec!["modal"]);
}

#[test]
fn test_non_script_files_are_ignored() {
    let dir = project(&[
        ("src/index.css", ".hero { }"),
        ("src/README.md", "The hero banner"),
        ("src/page.html", "<div class=\"hero\"></div>"),
    ]);

    assert_eq!(class_names(analyze(dir.path()).findings()), vec!["hero"]);
}

// ============================================================================
// Stylesheet handling
// ============================================================================

#[test]
fn test_plain_stylesheet_wins_over_scss() {
    let dir = project(&[
        ("src/index.css", ".from-css { }"),
        ("src/index.scss", ".from-scss { }"),
    ]);

    let outcome = analyze(dir.path());
    assert_eq!(outcome.stylesheet(), Some(dir.path().join("src/index.css").as_path()));
    assert_eq!(class_names(outcome.findings()), vec!["from-css"]);
}

#[test]
fn test_scss_stylesheet_with_nesting() {
    let dir = project(&[
        (
            "src/index.scss",
            "$gap: 4px;\n.list {\n  // .ghost { }\n  .item { margin: $gap; }\n  &:hover { }\n}\n",
        ),
        ("src/List.tsx", "<ul className=\"list\" />"),
    ]);

    let outcome = analyze(dir.path());
    let findings = outcome.findings();
    assert_eq!(class_names(findings), vec!["item"]);
    assert_eq!(findings[0].range.start, Position { line: 3, col: 2 });
}

#[test]
fn test_scss_url_expression_and_byte_order_mark() {
    let dir = project(&[
        (
            "src/index.scss",
            "\u{feff}.hero {\n  background: url($assets + '/hero.png');\n}\n.ghost { }\n",
        ),
        ("src/Hero.tsx", "<section className=\"hero\" />"),
    ]);

    let outcome = analyze(dir.path());
    let report = outcome.report().expect("Stylesheet should be analyzed");
    assert_eq!(class_names(&report.findings), vec!["ghost"]);
    assert_eq!(report.stats.class_records, 2);
}

#[test]
fn test_malformed_stylesheet_fails_softly() {
    let dir = project(&[
        ("src/index.css", ".a { color: red;\n.b { }"),
        ("src/App.tsx", ""),
    ]);

    let outcome = analyze(dir.path());
    match &outcome {
        AnalysisOutcome::Failed(StylesheetError::Parse { path, .. }) => {
            assert_eq!(path, &dir.path().join("src/index.css"));
        }
        other => panic!("Expected a parse failure, got {:?}", other),
    }
    assert!(outcome.findings().is_empty());
}

#[test]
fn test_unreadable_script_is_skipped() {
    let dir = project(&[
        ("src/index.css", ".card { }\n.modal { }\n"),
        ("src/App.tsx", "card"),
    ]);
    fs::write(dir.path().join("src/Binary.js"), [0xffu8, 0xfe, 0xfd]).unwrap();

    let outcome = analyze(dir.path());
    let report = outcome.report().expect("Stylesheet should be analyzed");
    assert_eq!(class_names(&report.findings), vec!["modal"]);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].path.ends_with("src/Binary.js"));
}

#[test]
fn test_inaccessible_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    assert!(Analyzer::new(Config::default()).analyze(&missing).is_err());
}

// ============================================================================
// Determinism and publication
// ============================================================================

#[test]
fn test_analysis_is_idempotent() {
    let dir = project(&[
        ("src/index.scss", ".a { }\n.b.c { }\n.d:focus { }\n@media print { .e { } }\n"),
        ("src/one.js", "a"),
        ("src/two.ts", "e"),
    ]);

    let first = analyze(dir.path());
    let second = analyze(dir.path());
    assert_eq!(first.findings(), second.findings());
    assert_eq!(class_names(first.findings()), vec!["b.c", "d"]);
}

#[test]
fn test_sequential_mode_matches_parallel_mode() {
    let dir = project(&[
        ("src/index.css", ".a { }\n.b { }\n.c { }\n"),
        ("src/x.js", "a"),
        ("src/y.jsx", "c"),
    ]);

    let sequential = Config {
        parallel: false,
        ..Config::default()
    };
    let a = analyze(dir.path());
    let b = Analyzer::new(sequential).analyze(dir.path()).unwrap();
    assert_eq!(a.findings(), b.findings());
}

#[test]
fn test_store_tracks_latest_run() {
    let dir = project(&[
        ("src/index.css", ".a { }\n.b { }\n"),
        ("src/x.js", "a"),
    ]);
    let analyzer = Analyzer::new(Config::default());
    let store = FindingStore::new();
    let stylesheet = dir.path().join("src/index.css");

    let first = store.begin();
    let outcome = analyzer.analyze(dir.path()).unwrap();
    assert!(store.publish(first, &outcome));
    assert_eq!(class_names(&store.findings(&stylesheet)), vec!["b"]);

    // The stylesheet disappears: the next run clears everything
    fs::remove_file(&stylesheet).unwrap();
    let second = store.begin();
    let outcome = analyzer.analyze(dir.path()).unwrap();
    assert!(store.publish(second, &outcome));
    assert!(store.snapshot().is_empty());
}

// ============================================================================
// Fixture project
// ============================================================================

#[test]
fn test_react_fixture() {
    let root = fixtures_path().join("react-app");
    if !root.exists() {
        eprintln!("Fixture not found: {:?}", root);
        return;
    }

    let outcome = analyze(&root);
    let findings = outcome.findings();

    assert_eq!(
        class_names(findings),
        vec!["button.primary", "orphan", "never-used", "mobile-only"],
        "Unexpected findings: {:#?}",
        findings
    );
    assert_eq!(findings[0].range.start, Position { line: 10, col: 0 });
    assert_eq!(findings[3].range.start, Position { line: 15, col: 2 });
    assert!(
        !class_names(findings).contains(&"commented-out"),
        "SCSS line comments should not produce rules"
    );
}
