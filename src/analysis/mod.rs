// Analysis module - the stylesheet → findings pipeline

mod diagnostics;
mod extract;
mod matcher;

pub use diagnostics::{unused_message, DiagnosticBuilder, Finding, Position, Range, Severity};
pub use extract::{class_name, ClassExtractor, ClassRecord};
pub use matcher::{atomic_tokens, UsageMatcher, UsedSet};

use crate::config::Config;
use crate::discovery::{resolve_stylesheet, ScanError, ScriptFinder, SkippedFile};
use crate::parser::{StyleParser, StylesheetError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counters for one completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub class_records: usize,
    pub script_files: usize,
    pub skipped_files: usize,
    pub used_tokens: usize,
    pub findings: usize,
    pub duration_ms: u128,
}

/// Result of analyzing one stylesheet against the project's scripts
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub stylesheet: PathBuf,
    pub findings: Vec<Finding>,
    pub skipped: Vec<SkippedFile>,
    pub stats: AnalysisStats,
}

/// What a run produced. Only an inaccessible project root is an `Err`;
/// everything here is a normal outcome.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// None of the candidate stylesheets exist
    NoStylesheet,

    /// The stylesheet could not be read or parsed
    Failed(StylesheetError),

    Analyzed(AnalysisReport),
}

impl AnalysisOutcome {
    /// Findings of the run, empty unless the stylesheet was analyzed
    pub fn findings(&self) -> &[Finding] {
        match self {
            AnalysisOutcome::Analyzed(report) => &report.findings,
            _ => &[],
        }
    }

    pub fn stylesheet(&self) -> Option<&Path> {
        match self {
            AnalysisOutcome::NoStylesheet => None,
            AnalysisOutcome::Failed(error) => Some(error.path()),
            AnalysisOutcome::Analyzed(report) => Some(&report.stylesheet),
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Analyzed(report) => Some(report),
            _ => None,
        }
    }
}

/// Runs the full pipeline: resolve, parse, extract, scan, match, diagnose.
///
/// Holds no state between runs, so calling `analyze` twice on unchanged
/// input yields the same findings.
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn analyze(&self, root: &Path) -> Result<AnalysisOutcome, ScanError> {
        let start = Instant::now();

        // Fail early on a bad root or pattern even without a stylesheet
        let finder = ScriptFinder::new(&self.config)?;
        finder.check_root(root)?;

        let Some(stylesheet) = resolve_stylesheet(root, &self.config) else {
            debug!("No stylesheet under {}, nothing to analyze", root.display());
            return Ok(AnalysisOutcome::NoStylesheet);
        };

        let document = match StyleParser::for_path(&stylesheet).parse_file(&stylesheet) {
            Ok(document) => document,
            Err(error) => {
                warn!("Cannot analyze stylesheet: {}", error);
                return Ok(AnalysisOutcome::Failed(error));
            }
        };

        let records = ClassExtractor::new().extract(&document);
        let corpus = finder.read(finder.walk(root));

        let used = UsageMatcher::new()
            .with_parallel(self.config.parallel)
            .used_tokens(&records, &corpus.files);
        let findings = DiagnosticBuilder::new(&stylesheet).build(&records, &used);

        let stats = AnalysisStats {
            class_records: records.len(),
            script_files: corpus.files.len(),
            skipped_files: corpus.skipped.len(),
            used_tokens: used.len(),
            findings: findings.len(),
            duration_ms: start.elapsed().as_millis(),
        };

        info!(
            "Analyzed {}: {} classes, {} scripts, {} unused",
            stylesheet.display(),
            stats.class_records,
            stats.script_files,
            stats.findings
        );

        Ok(AnalysisOutcome::Analyzed(AnalysisReport {
            stylesheet,
            findings,
            skipped: corpus.skipped,
            stats,
        }))
    }
}
