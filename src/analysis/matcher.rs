use super::ClassRecord;
use crate::discovery::SourceFile;
use rayon::prelude::*;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// Atomic tokens confirmed present in at least one script
pub type UsedSet = HashSet<String>;

/// Split a class name into the tokens matched against scripts.
///
/// `a.b` -> `["a", "b"]`; a name without `.` is its own single token.
pub fn atomic_tokens(name: &str) -> Vec<&str> {
    if name.contains('.') {
        name.split('.').map(str::trim).collect()
    } else {
        vec![name]
    }
}

/// Whole-word pattern for one token. A word is a run of identifier
/// characters, `-` included, so `btn` is not found in `btn-icon` or
/// `btn_icon` but is found in `styles.btn` or `"btn primary"`.
fn word_pattern(token: &str) -> Option<Regex> {
    let pattern = format!(r"(?:^|[^\w-]){}(?:$|[^\w-])", regex::escape(token));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!("Cannot match class token {:?}, treating it as unused: {}", token, err);
            None
        }
    }
}

/// Decides which class tokens appear in the script corpus
#[derive(Debug, Clone)]
pub struct UsageMatcher {
    parallel: bool,
}

impl Default for UsageMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageMatcher {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the set of tokens, drawn from `records`, that appear as a
    /// whole word in at least one file
    pub fn used_tokens(&self, records: &[ClassRecord], files: &[SourceFile]) -> UsedSet {
        let tokens: BTreeSet<&str> = records
            .iter()
            .flat_map(|record| atomic_tokens(&record.name))
            .filter(|token| !token.is_empty())
            .collect();

        let patterns: Vec<(&str, Regex)> = tokens
            .into_iter()
            .filter_map(|token| word_pattern(token).map(|re| (token, re)))
            .collect();

        let is_used = |(token, pattern): &(&str, Regex)| {
            files
                .iter()
                .any(|file| pattern.is_match(&file.content))
                .then(|| token.to_string())
        };

        let used: UsedSet = if self.parallel {
            patterns.par_iter().filter_map(is_used).collect()
        } else {
            patterns.iter().filter_map(is_used).collect()
        };

        debug!(
            "{} of {} tokens used across {} files",
            used.len(),
            patterns.len(),
            files.len()
        );
        used
    }
}
