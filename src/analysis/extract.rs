//! Class-selector extraction from a parsed stylesheet

use crate::parser::{RuleNode, StyleDocument};
use serde::Serialize;
use tracing::{debug, trace};

/// A class selector as it appears in the stylesheet.
///
/// `name` has no leading dot and no pseudo suffix, and is never empty. It
/// is still compound (`"a.b"`) when the selector chains several classes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClassRecord {
    pub name: String,

    /// 0-based line
    pub line: usize,

    /// 0-based column, in UTF-16 code units
    pub col: usize,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            name: name.into(),
            line,
            col,
        }
    }

    /// Whether the name chains several classes, e.g. `a.b`
    pub fn is_compound(&self) -> bool {
        self.name.contains('.')
    }
}

/// Turns the rules of a stylesheet into class records
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassExtractor;

impl ClassExtractor {
    pub fn new() -> Self {
        Self
    }

    /// One record per rule whose selector starts with `.`, in document order
    pub fn extract(&self, document: &StyleDocument) -> Vec<ClassRecord> {
        let records: Vec<ClassRecord> = document
            .rules()
            .filter_map(|rule| self.record_for(rule))
            .collect();

        debug!(
            "Extracted {} class records from {}",
            records.len(),
            document.path.display()
        );
        records
    }

    /// Derive the record for a single rule, if it is a class selector
    pub fn record_for(&self, rule: &RuleNode) -> Option<ClassRecord> {
        let name = class_name(&rule.selector)?;
        trace!("Class '{}' at {}:{}", name, rule.line, rule.column);
        Some(ClassRecord::new(
            name,
            rule.line.saturating_sub(1),
            rule.column.saturating_sub(1),
        ))
    }
}

/// `.btn:hover` -> `btn`. Returns `None` for selectors that do not start
/// with a class marker or reduce to nothing.
pub fn class_name(selector: &str) -> Option<&str> {
    if !selector.starts_with('.') {
        return None;
    }

    let before_pseudo = selector.split(':').next().unwrap_or(selector);
    let name = before_pseudo.strip_prefix('.').unwrap_or(before_pseudo).trim();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
