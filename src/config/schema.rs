//! Configuration data structures for the scanner.
//!
//! Defines the YAML config format: directory-walk options, extraction
//! parallelism, and output format. Every default reproduces the plain scan
//! behavior, so an empty file and no file at all are equivalent.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for a scan.
///
/// Loaded from YAML and then overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    /// Directory-walk options shared by manifest detection and extraction.
    #[serde(default)]
    pub walk: WalkConfig,

    /// How source files are processed.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Report rendering.
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            walk: WalkConfig::default(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Options for walking the repository tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Follow symbolic links to directories.
    #[serde(default)]
    pub follow_links: bool,

    /// Directory names never descended into (matched against the final path
    /// component, e.g. `node_modules`). Empty means every directory is visited.
    #[serde(default)]
    pub skip_dirs: Vec<String>,

    /// Source files larger than this many bytes are skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_bytes: Option<u64>,
}

impl WalkConfig {
    /// Whether a directory with this file name should be pruned.
    pub fn is_skipped_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == name)
    }
}

// ---------------------------------------------------------------------------
// ExtractionConfig
// ---------------------------------------------------------------------------

/// Extraction tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Extract files in parallel with rayon.
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Worker threads for parallel extraction. `None` uses rayon's global pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            parallel: default_parallel(),
            threads: None,
        }
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Report format written to stdout.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_parallel() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
