//! Capability extractors: turn one source file into [`Findings`].
//!
//! Two strategies sit behind the [`Extractor`] trait:
//! - [`PythonExtractor`] walks a tree-sitter syntax tree and inspects
//!   decorators on function definitions.
//! - [`HeuristicExtractor`] matches `.tool(...)`, `.resource(...)` and
//!   `.prompt(...)` call shapes in raw JavaScript/TypeScript text.
//!
//! Extractors see already-decoded source text; reading files and size limits
//! are the scanner's business.

pub mod heuristic;
pub mod parser;
pub mod python;

use std::path::Path;

use crate::error::SkipReason;
use crate::types::Findings;

pub use heuristic::HeuristicExtractor;
pub use parser::SourceParser;
pub use python::PythonExtractor;

/// A per-language capability extractor.
pub trait Extractor: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether `path` is a candidate source file for this extractor.
    fn accepts(&self, path: &Path) -> bool;

    /// Extract every capability declared in `source`.
    ///
    /// `file_name` is recorded as the `source_file` of each finding.
    fn extract(&self, source: &str, file_name: &str) -> Result<Findings, SkipReason>;
}

/// True when the file name of `path` ends with one of `extensions`.
pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| extensions.iter().any(|ext| name.ends_with(ext)))
        .unwrap_or(false)
}
