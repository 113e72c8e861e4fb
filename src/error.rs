//! Error types for the scanner.
//!
//! [`ScanError`] covers the few conditions that can stop a caller before a
//! scan starts (bad configuration, thread pool setup, pattern compilation).
//! Everything that goes wrong *during* a scan is a [`SkipReason`]: it is
//! logged against the file it happened in and never escalated.

use thiserror::Error;

/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Fatal errors raised while setting up or driving a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern compilation failed: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("{0}")]
    Other(String),
}

/// Why a single file contributed no findings.
///
/// These are collected per file and counted in the scan statistics; none of
/// them affects any other file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("unreadable: {0}")]
    Unreadable(String),

    #[error("not valid UTF-8")]
    Encoding,

    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    #[error("syntax error")]
    Syntax,

    #[error("grammar unavailable: {0}")]
    Grammar(String),
}

impl SkipReason {
    /// Short stable label used as a statistics key.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unreadable(_) => "unreadable",
            Self::Encoding => "encoding",
            Self::TooLarge { .. } => "too_large",
            Self::Syntax => "syntax",
            Self::Grammar(_) => "grammar",
        }
    }
}
