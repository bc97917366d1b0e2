use super::{ClassRecord, UsedSet};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Severity of a finding. Unused classes are only ever warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 0-based line and UTF-16 column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

/// One unused class selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Stylesheet the class is declared in
    pub stylesheet: PathBuf,

    /// Class name as extracted, possibly compound
    pub class_name: String,

    pub range: Range,

    /// Length of the class name in UTF-16 units
    pub length: usize,

    pub message: String,
    pub severity: Severity,
}

impl Finding {
    pub fn line(&self) -> usize {
        self.range.start.line
    }

    pub fn col(&self) -> usize {
        self.range.start.col
    }
}

/// Message attached to an unused class
pub fn unused_message(name: &str) -> String {
    format!("Class \".{}\" is not used in project", name)
}

/// Turns unmatched class records into findings
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    stylesheet: PathBuf,
}

impl DiagnosticBuilder {
    pub fn new(stylesheet: &Path) -> Self {
        Self {
            stylesheet: stylesheet.to_path_buf(),
        }
    }

    /// One finding per record whose full name is not in `used`.
    ///
    /// The lookup uses the record's own name while `used` only holds atomic
    /// tokens, so a compound record such as `a.b` is always reported.
    pub fn build(&self, records: &[ClassRecord], used: &UsedSet) -> Vec<Finding> {
        let findings: Vec<Finding> = records
            .iter()
            .filter(|record| !used.contains(&record.name))
            .map(|record| self.finding_for(record))
            .collect();

        debug!(
            "{} of {} class records unused in {}",
            findings.len(),
            records.len(),
            self.stylesheet.display()
        );
        findings
    }

    fn finding_for(&self, record: &ClassRecord) -> Finding {
        let length = record.name.encode_utf16().count();
        // The range runs one unit past the name
        let range = Range {
            start: Position {
                line: record.line,
                col: record.col,
            },
            end: Position {
                line: record.line,
                col: record.col + length + 1,
            },
        };

        Finding {
            stylesheet: self.stylesheet.clone(),
            class_name: record.name.clone(),
            range,
            length,
            message: unused_message(&record.name),
            severity: Severity::Warning,
        }
    }
}
