use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for an unused-styles analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Candidate stylesheets relative to the project root, checked in order.
    /// The first one that exists is analyzed.
    pub stylesheets: Vec<PathBuf>,

    /// Glob selecting the script files whose text counts as a usage
    pub scripts: String,

    /// Directory names pruned from the scan at any depth
    pub exclude_dirs: Vec<String>,

    /// Honour .gitignore / .ignore files while scanning
    pub respect_gitignore: bool,

    /// Read and match files on the rayon thread pool
    pub parallel: bool,

    /// Watch mode configuration
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet period before a burst of file events triggers a run
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stylesheets: vec![
                PathBuf::from("src/index.css"),
                PathBuf::from("src/index.scss"),
            ],
            scripts: "**/*.{js,jsx,ts,tsx}".to_string(),
            exclude_dirs: vec![
                "node_modules".to_string(),
                ".next".to_string(),
                "dist".to_string(),
            ],
            respect_gitignore: false,
            parallel: true,
            watch: WatchConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".unused-styles.yml",
            ".unused-styles.yaml",
            ".unused-styles.toml",
            "unused-styles.yml",
            "unused-styles.yaml",
            "unused-styles.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // No config file found, use defaults
        Ok(Self::default())
    }

    /// Check whether a directory name is pruned from the scan
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|dir| dir == name)
    }
}
