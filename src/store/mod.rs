//! Caller-owned store of published findings.
//!
//! Analysis runs may overlap when triggers arrive faster than a run
//! completes. Each run takes a [`RunTicket`] before it starts and hands it
//! back when publishing. Only the most recently started run may publish, so
//! a slow run that finishes late never overwrites a newer result.

use crate::analysis::{AnalysisOutcome, Finding};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Generation handed out to a run when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunTicket(u64);

impl RunTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct StoreState {
    started: u64,
    published: u64,
    findings: BTreeMap<PathBuf, Vec<Finding>>,
}

/// Findings keyed by stylesheet path, replaced wholesale on every publish
#[derive(Debug, Default)]
pub struct FindingStore {
    state: Mutex<StoreState>,
}

impl FindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // A panic while holding the lock cannot leave a half-written snapshot
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register the start of a run
    pub fn begin(&self) -> RunTicket {
        let mut state = self.lock();
        state.started += 1;
        RunTicket(state.started)
    }

    /// Replace the published findings with the outcome of the run holding
    /// `ticket`. Returns `false`, leaving the store untouched, when a newer
    /// run has started since.
    pub fn publish(&self, ticket: RunTicket, outcome: &AnalysisOutcome) -> bool {
        let mut state = self.lock();
        if ticket.0 != state.started {
            debug!(
                "Discarding stale run {} (latest started: {})",
                ticket.0, state.started
            );
            return false;
        }

        state.findings.clear();
        if let AnalysisOutcome::Analyzed(report) = outcome {
            state
                .findings
                .insert(report.stylesheet.clone(), report.findings.clone());
        }
        state.published = ticket.0;
        true
    }

    /// Currently published findings for one stylesheet
    pub fn findings(&self, stylesheet: &Path) -> Vec<Finding> {
        self.lock().findings.get(stylesheet).cloned().unwrap_or_default()
    }

    /// Every published finding, grouped by stylesheet
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<Finding>> {
        self.lock().findings.clone()
    }

    /// Generation of the run whose result is visible, if any
    pub fn published(&self) -> Option<RunTicket> {
        let state = self.lock();
        (state.published > 0).then_some(RunTicket(state.published))
    }
}
