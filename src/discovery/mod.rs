mod file_finder;

pub use file_finder::{resolve_stylesheet, Corpus, ScanError, ScriptFinder, SkippedFile, SourceFile};
