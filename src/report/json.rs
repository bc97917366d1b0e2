use crate::analysis::{AnalysisOutcome, Severity};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, outcome: &AnalysisOutcome) -> Result<()> {
        let json = self.render(outcome)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    pub fn render(&self, outcome: &AnalysisOutcome) -> Result<String> {
        let report = JsonReport::from_outcome(outcome);
        serde_json::to_string_pretty(&report).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    status: &'static str,
    stylesheet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    total_issues: usize,
    issues: Vec<JsonIssue>,
    skipped_files: Vec<JsonSkipped>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonIssue {
    severity: &'static str,
    message: String,
    file: String,
    class_name: String,
    line: usize,
    column: usize,
    length: usize,
    end_line: usize,
    end_column: usize,
}

#[derive(Serialize)]
struct JsonSkipped {
    file: String,
    reason: String,
}

#[derive(Serialize, Default)]
struct JsonSummary {
    warnings: usize,
    class_records: usize,
    script_files: usize,
    duration_ms: u128,
}

impl JsonReport {
    fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        let stylesheet = outcome
            .stylesheet()
            .map(|p| p.to_string_lossy().to_string());

        let (status, error) = match outcome {
            AnalysisOutcome::NoStylesheet => ("no_stylesheet", None),
            AnalysisOutcome::Failed(e) => ("failed", Some(e.to_string())),
            AnalysisOutcome::Analyzed(_) => ("analyzed", None),
        };

        let mut summary = JsonSummary::default();
        let issues: Vec<JsonIssue> = outcome
            .findings()
            .iter()
            .map(|finding| {
                match finding.severity {
                    Severity::Warning => summary.warnings += 1,
                }

                JsonIssue {
                    severity: finding.severity.as_str(),
                    message: finding.message.clone(),
                    file: finding.stylesheet.to_string_lossy().to_string(),
                    class_name: finding.class_name.clone(),
                    line: finding.range.start.line,
                    column: finding.range.start.col,
                    length: finding.length,
                    end_line: finding.range.end.line,
                    end_column: finding.range.end.col,
                }
            })
            .collect();

        let skipped_files = match outcome.report() {
            Some(report) => {
                summary.class_records = report.stats.class_records;
                summary.script_files = report.stats.script_files;
                summary.duration_ms = report.stats.duration_ms;
                report
                    .skipped
                    .iter()
                    .map(|s| JsonSkipped {
                        file: s.path.to_string_lossy().to_string(),
                        reason: s.reason.clone(),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        Self {
            version: "1.0",
            status,
            stylesheet,
            error,
            total_issues: issues.len(),
            issues,
            skipped_files,
            summary,
        }
    }
}
