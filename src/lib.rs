//! unused-styles - Find CSS/SCSS class selectors no script ever mentions
//!
//! This library detects class selectors declared in a project's stylesheet
//! that never appear, as a whole word, in the project's JavaScript or
//! TypeScript sources.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **Stylesheet Resolution** - Pick the first configured stylesheet that exists
//! 2. **Parsing** - Build a rule tree from CSS or SCSS using cssparser
//! 3. **Extraction** - Turn class-selector rules into positioned records
//! 4. **Discovery** - Find and read all script files
//! 5. **Matching** - Find which class tokens appear in the scripts
//! 6. **Diagnostics** - Report every record whose name was not found
//!
//! Each run is independent. Callers that run analyses concurrently publish
//! results through a [`FindingStore`], which keeps only the newest run.

pub mod config;
pub mod discovery;
pub mod parser;
pub mod analysis;
pub mod report;
pub mod store;
pub mod watch;

pub use config::Config;
pub use discovery::{ScriptFinder, SourceFile};
pub use parser::{Dialect, StyleParser, StyleDocument};
pub use analysis::{Analyzer, AnalysisOutcome, ClassRecord, Finding, Severity};
pub use report::{Reporter, ReportFormat};
pub use store::{FindingStore, RunTicket};
