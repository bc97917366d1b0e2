use crate::config::Config;
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Failures that make the whole scan meaningless
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Project root {} is not accessible: {source}", .root.display())]
    RootInaccessible {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// A script file and its full text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute (root-joined) path
    pub path: PathBuf,

    /// UTF-8 contents
    pub content: String,
}

impl SourceFile {
    pub fn new(path: PathBuf, content: String) -> Self {
        Self { path, content }
    }
}

/// A script that matched the pattern but could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything the scanner produced for one run
#[derive(Debug, Default)]
pub struct Corpus {
    pub files: Vec<SourceFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Return the first configured stylesheet candidate that exists under `root`
pub fn resolve_stylesheet(root: &Path, config: &Config) -> Option<PathBuf> {
    let found = config
        .stylesheets
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.is_file());

    match &found {
        Some(path) => debug!("Using stylesheet: {}", path.display()),
        None => debug!("No stylesheet found under {}", root.display()),
    }
    found
}

/// Finds and loads the project's script files
pub struct ScriptFinder<'a> {
    config: &'a Config,
    matcher: GlobMatcher,
}

impl<'a> ScriptFinder<'a> {
    pub fn new(config: &'a Config) -> Result<Self, ScanError> {
        let matcher = Glob::new(&config.scripts)
            .map_err(|source| ScanError::InvalidPattern {
                pattern: config.scripts.clone(),
                source,
            })?
            .compile_matcher();

        Ok(Self { config, matcher })
    }

    /// Check a path against the script pattern, relative to `root`
    pub fn is_script(&self, root: &Path, path: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        let normalized = relative.to_string_lossy().replace('\\', "/");
        self.matcher.is_match(normalized.as_str())
    }

    /// Fail unless `root` is a directory that can be listed
    pub fn check_root(&self, root: &Path) -> Result<(), ScanError> {
        std::fs::read_dir(root).map_err(|source| ScanError::RootInaccessible {
            root: root.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// List every script under `root`, sorted, skipping excluded directories
    pub fn find_paths(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        self.check_root(root)?;
        Ok(self.walk(root))
    }

    /// Walk a root that already passed [`ScriptFinder::check_root`]
    pub(crate) fn walk(&self, root: &Path) -> Vec<PathBuf> {
        debug!("Scanning for scripts in: {}", root.display());

        let respect_ignore = self.config.respect_gitignore;
        let pruning = self.config.clone();

        let walker = WalkBuilder::new(root)
            .hidden(true)                  // Skip hidden files
            .git_ignore(respect_ignore)
            .git_global(respect_ignore)
            .git_exclude(respect_ignore)
            .ignore(respect_ignore)
            .parents(respect_ignore)
            .follow_links(false)           // Don't follow symlinks
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                let excluded = entry
                    .file_name()
                    .to_str()
                    .map(|name| pruning.is_excluded_dir(name))
                    .unwrap_or(false);
                !(is_dir && entry.depth() > 0 && excluded)
            })
            .build();

        let mut paths = Vec::new();
        for result in walker {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            if self.is_script(root, path) {
                trace!("Found script: {}", path.display());
                paths.push(path.to_path_buf());
            }
        }

        paths.sort();
        debug!("Found {} script files", paths.len());
        paths
    }

    /// Find every script and read it. Unreadable files are skipped and
    /// reported, never fatal.
    pub fn load(&self, root: &Path) -> Result<Corpus, ScanError> {
        let paths = self.find_paths(root)?;
        Ok(self.read(paths))
    }

    /// Read the given scripts into a corpus
    pub fn read(&self, paths: Vec<PathBuf>) -> Corpus {
        let read = |path: PathBuf| {
            let result = std::fs::read_to_string(&path);
            (path, result)
        };
        let results: Vec<_> = if self.config.parallel {
            paths.into_par_iter().map(read).collect()
        } else {
            paths.into_iter().map(read).collect()
        };

        let mut corpus = Corpus::default();
        for (path, result) in results {
            match result {
                Ok(content) => corpus.files.push(SourceFile::new(path, content)),
                Err(err) => {
                    warn!("Skipping {}: {}", path.display(), err);
                    corpus.skipped.push(SkippedFile {
                        path,
                        reason: err.to_string(),
                    });
                }
            }
        }

        corpus
    }
}
