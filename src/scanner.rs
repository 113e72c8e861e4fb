//! Scan orchestration: classify the repository, then extract capabilities.
//!
//! One scan is one manifest walk, optionally followed by one extraction walk.
//! Candidate files are collected in walk order, processed independently
//! (in parallel by default), and merged back in that same order, so the
//! report is deterministic regardless of thread scheduling.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use crate::config::ScannerConfig;
use crate::error::{Result, ScanError, SkipReason};
use crate::extract::{Extractor, HeuristicExtractor, PythonExtractor};
use crate::manifest::classify_repository;
use crate::types::{Findings, Language, ScanResult};
use crate::walk::walk_tree;

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Counters describing how a scan went.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Directory whose manifest classified the repository.
    pub manifest_dir: Option<PathBuf>,
    /// Candidate source files handed to the extractor.
    pub files_examined: usize,
    /// Files that produced at least one capability.
    pub files_with_findings: usize,
    /// Skipped files keyed by [`SkipReason::label`].
    pub skipped: BTreeMap<&'static str, usize>,
    pub elapsed: Duration,
}

impl ScanStats {
    pub fn files_skipped(&self) -> usize {
        self.skipped.values().sum()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "manifest_dir": self.manifest_dir.as_ref().map(|p| p.display().to_string()),
            "files_examined": self.files_examined,
            "files_with_findings": self.files_with_findings,
            "files_skipped": self.files_skipped(),
            "skipped": self.skipped,
            "elapsed_ms": self.elapsed.as_millis() as u64,
        })
    }
}

/// A [`ScanResult`] together with its [`ScanStats`].
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub result: ScanResult,
    pub stats: ScanStats,
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// Repository scanner. Build once, scan any number of repositories.
pub struct Scanner {
    config: ScannerConfig,
    python: PythonExtractor,
    heuristic: HeuristicExtractor,
    pool: Option<rayon::ThreadPool>,
}

impl Scanner {
    /// Create a scanner, compiling patterns and building a dedicated thread
    /// pool when `extraction.threads` is set.
    pub fn new(config: ScannerConfig) -> Result<Self> {
        let pool = match config.extraction.threads {
            Some(0) => {
                return Err(ScanError::Config(
                    "extraction.threads must be at least 1".into(),
                ))
            }
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("mcpscan-extract-{i}"))
                    .build()
                    .map_err(|e| ScanError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            config,
            python: PythonExtractor::new(),
            heuristic: HeuristicExtractor::new()?,
            pool,
        })
    }

    /// Scan the repository at `root`.
    pub fn scan(&self, root: &Path) -> ScanResult {
        self.scan_detailed(root).result
    }

    /// Scan the repository at `root`, keeping statistics.
    ///
    /// Never fails: unreadable manifests, unreadable files and unparseable
    /// sources are skipped and counted.
    pub fn scan_detailed(&self, root: &Path) -> ScanOutcome {
        let started = Instant::now();
        let mut stats = ScanStats::default();

        let classification = classify_repository(root, &self.config.walk);
        stats.manifest_dir = classification.manifest_dir;

        if !classification.is_mcp_repository {
            stats.elapsed = started.elapsed();
            return ScanOutcome {
                result: ScanResult::not_mcp(),
                stats,
            };
        }

        let mut result = ScanResult::classified(classification.language);
        if let Some(extractor) = self.extractor_for(classification.language) {
            let files = self.candidate_files(root, extractor);
            stats.files_examined = files.len();
            tracing::info!(
                extractor = extractor.name(),
                files = files.len(),
                "extracting capabilities"
            );

            for (path, outcome) in self.extract_all(&files, extractor) {
                match outcome {
                    Ok(findings) => {
                        if !findings.is_empty() {
                            stats.files_with_findings += 1;
                            tracing::debug!(
                                path = %path.display(),
                                capabilities = findings.len(),
                                "capabilities found"
                            );
                        }
                        result.absorb(findings);
                    }
                    Err(reason) => {
                        tracing::debug!(path = %path.display(), %reason, "skipping file");
                        *stats.skipped.entry(reason.label()).or_default() += 1;
                    }
                }
            }
        }

        stats.elapsed = started.elapsed();
        tracing::info!(
            language = %result.language,
            tools = result.tools.len(),
            prompts = result.prompts.len(),
            resources = result.resources.len(),
            resource_templates = result.resource_templates.len(),
            skipped = stats.files_skipped(),
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "scan complete"
        );

        ScanOutcome { result, stats }
    }

    fn extractor_for(&self, language: Language) -> Option<&dyn Extractor> {
        match language {
            Language::Unknown => None,
            Language::Python => Some(&self.python),
            Language::JavaScript | Language::TypeScript => Some(&self.heuristic),
        }
    }

    fn candidate_files(&self, root: &Path, extractor: &dyn Extractor) -> Vec<PathBuf> {
        walk_tree(root, &self.config.walk)
            .filter(|entry| !entry.file_type().is_dir() && extractor.accepts(entry.path()))
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Extract every file, returning outcomes in the order of `files`.
    fn extract_all<'f>(
        &self,
        files: &'f [PathBuf],
        extractor: &dyn Extractor,
    ) -> Vec<(&'f PathBuf, std::result::Result<Findings, SkipReason>)> {
        if !self.config.extraction.parallel {
            return files
                .iter()
                .map(|path| (path, self.extract_file(path, extractor)))
                .collect();
        }

        let run = || {
            files
                .par_iter()
                .map(|path| (path, self.extract_file(path, extractor)))
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn extract_file(
        &self,
        path: &Path,
        extractor: &dyn Extractor,
    ) -> std::result::Result<Findings, SkipReason> {
        let source = read_source(path, self.config.walk.max_file_bytes)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        extractor.extract(&source, &file_name)
    }
}

/// Read a source file as UTF-8, enforcing the optional size limit.
fn read_source(path: &Path, max_bytes: Option<u64>) -> std::result::Result<String, SkipReason> {
    if let Some(limit) = max_bytes {
        let size = fs::metadata(path)
            .map_err(|e| SkipReason::Unreadable(e.to_string()))?
            .len();
        if size > limit {
            return Err(SkipReason::TooLarge { size, limit });
        }
    }

    let bytes = fs::read(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    let source = String::from_utf8(bytes).map_err(|_| SkipReason::Encoding)?;
    match source.strip_prefix('\u{feff}') {
        Some(stripped) => Ok(stripped.to_string()),
        None => Ok(source),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
