//! Watch mode for unused-styles
//!
//! Monitors the project for script and stylesheet changes and re-runs the
//! analysis after each debounced burst of events.

use colored::Colorize;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Component, Path};
use std::sync::mpsc::channel;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Watch mode errors
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to create file watcher: {0}")]
    Watcher(#[from] notify::Error),
    #[error("Failed to receive events: {0}")]
    Recv(#[from] std::sync::mpsc::RecvError),
}

/// File watcher for continuous analysis
pub struct FileWatcher {
    /// Debounce duration in milliseconds
    debounce_ms: u64,
    /// File extensions to watch
    extensions: Vec<String>,
    /// Directory names whose contents never trigger a run
    excluded_dirs: Vec<String>,
}

impl FileWatcher {
    /// Create a new file watcher with default settings
    pub fn new() -> Self {
        Self {
            debounce_ms: 500,
            extensions: ["js", "jsx", "ts", "tsx", "css", "scss"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            excluded_dirs: Vec::new(),
        }
    }

    /// Set debounce duration
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    pub fn with_excluded_dirs(mut self, dirs: Vec<String>) -> Self {
        self.excluded_dirs = dirs;
        self
    }

    /// Check if a path should trigger a re-run
    fn should_trigger(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext_str = ext.to_string_lossy().to_lowercase();
        if !self.extensions.iter().any(|e| e == &ext_str) {
            return false;
        }

        !path.components().any(|component| match component {
            Component::Normal(name) => self
                .excluded_dirs
                .iter()
                .any(|dir| name == dir.as_str()),
            _ => false,
        })
    }

    /// Start watching a directory and call the callback on changes
    pub fn watch<F>(&self, path: &Path, mut on_change: F) -> Result<(), WatchError>
    where
        F: FnMut() -> bool, // Returns false to stop watching
    {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(Duration::from_millis(self.debounce_ms), tx)?;
        debouncer.watcher().watch(path, RecursiveMode::Recursive)?;

        println!();
        println!("{}", "Watch mode active. Press Ctrl+C to stop.".cyan().bold());
        println!("{}", format!("   Watching: {}", path.display()).dimmed());
        println!();

        // Initial run
        if !on_change() {
            return Ok(());
        }

        loop {
            match rx.recv()? {
                Ok(events) => {
                    let relevant: Vec<_> = events
                        .iter()
                        .filter(|e| {
                            matches!(
                                e.kind,
                                DebouncedEventKind::Any | DebouncedEventKind::AnyContinuous
                            ) && self.should_trigger(&e.path)
                        })
                        .collect();

                    if relevant.is_empty() {
                        continue;
                    }

                    debug!("{} relevant file events", relevant.len());
                    println!();
                    println!(
                        "{}",
                        format!(
                            "Changes detected in {} file(s), re-analyzing...",
                            relevant.len()
                        )
                        .yellow()
                    );
                    for event in relevant.iter().take(5) {
                        if let Some(name) = event.path.file_name() {
                            println!("   • {}", name.to_string_lossy().dimmed());
                        }
                    }
                    if relevant.len() > 5 {
                        println!("   • ... and {} more", relevant.len() - 5);
                    }
                    println!();

                    if !on_change() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Watch error: {:?}", e);
                }
            }
        }

        Ok(())
    }
}

impl Default for FileWatcher {
    fn default() -> Self {
        Self::new()
    }
}
