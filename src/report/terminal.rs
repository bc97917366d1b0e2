use crate::analysis::{AnalysisOutcome, AnalysisReport, Finding, Severity};
use colored::Colorize;
use miette::Result;

/// Terminal reporter with colored output
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, outcome: &AnalysisOutcome) -> Result<()> {
        match outcome {
            AnalysisOutcome::NoStylesheet => {
                println!("{}", "No stylesheet found, nothing to analyze.".dimmed());
            }
            AnalysisOutcome::Failed(error) => {
                println!(
                    "{} {}",
                    "Could not analyze stylesheet:".red().bold(),
                    error
                );
            }
            AnalysisOutcome::Analyzed(report) => self.print_report(report),
        }
        Ok(())
    }

    fn print_report(&self, report: &AnalysisReport) {
        if report.findings.is_empty() {
            println!("{}", "No unused styles found!".green().bold());
        } else {
            println!();
            println!(
                "{}",
                format!("Found {} unused class selectors:", report.findings.len())
                    .yellow()
                    .bold()
            );
            println!();
            println!("{}", report.stylesheet.display().to_string().cyan().bold());

            for finding in &report.findings {
                self.print_item(finding);
            }
            println!();
        }

        if !report.skipped.is_empty() {
            println!("{}", "Skipped unreadable files:".yellow());
            for skipped in &report.skipped {
                println!(
                    "  {} {} ({})",
                    "→".dimmed(),
                    skipped.path.display(),
                    skipped.reason.dimmed()
                );
            }
            println!();
        }

        self.print_summary(report);
    }

    fn print_item(&self, finding: &Finding) {
        let severity_str = match finding.severity {
            Severity::Warning => "warning".yellow().bold(),
        };

        println!(
            "  {} {} {}",
            location(finding).dimmed(),
            severity_str,
            finding.message
        );
    }

    fn print_summary(&self, report: &AnalysisReport) {
        println!("{}", "─".repeat(60).dimmed());
        println!(
            "Summary: {} unused of {} class selectors, {} script files scanned in {}ms",
            report.findings.len().to_string().yellow(),
            report.stats.class_records,
            report.stats.script_files,
            report.stats.duration_ms
        );
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// `path:line:col`, 1-based like most editors and compilers print it
pub fn location(finding: &Finding) -> String {
    format!(
        "{}:{}:{}",
        finding.stylesheet.display(),
        finding.line() + 1,
        finding.col() + 1
    )
}
