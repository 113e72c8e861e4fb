//! mcpscan: static detection of Model Context Protocol servers.
//!
//! Classifies a repository from its dependency manifests, then catalogs the
//! tools, prompts, resources, and resource templates it declares: from a
//! tree-sitter syntax tree for Python, from call-shape heuristics for
//! JavaScript and TypeScript.

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod observability;
pub mod report;
pub mod scanner;
pub mod types;
pub mod walk;

pub use error::{Result, ScanError, SkipReason};
pub use scanner::{ScanOutcome, ScanStats, Scanner};
pub use types::{Capability, Language, ResourceCapability, ScanResult};
