//! Manifest classification: is this an MCP repository, and in which language?
//!
//! The tree is walked pre-order with entries sorted by name. Each directory's
//! dependency manifests are checked in turn, and the first directory that
//! carries MCP SDK evidence decides the result for the whole repository.
//! Manifests that cannot be read or parsed count as "no evidence".

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::WalkConfig;
use crate::types::Language;
use crate::walk::walk_tree;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const REQUIREMENTS_TXT: &str = "requirements.txt";
pub const PYPROJECT_TOML: &str = "pyproject.toml";
pub const PACKAGE_JSON: &str = "package.json";

/// Case-sensitive substrings marking the Python MCP SDK or FastMCP.
pub const PYTHON_MCP_MARKERS: &[&str] = &["mcp", "fastmcp"];

/// npm package name of the official MCP SDK.
pub const NPM_MCP_SDK: &str = "@modelcontextprotocol/sdk";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Result of manifest inspection for a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_mcp_repository: bool,
    pub language: Language,
    /// Directory whose manifest produced the match.
    pub manifest_dir: Option<PathBuf>,
}

impl Classification {
    fn matched(language: Language, dir: &Path) -> Self {
        Self {
            is_mcp_repository: true,
            language,
            manifest_dir: Some(dir.to_path_buf()),
        }
    }
}

/// Walk `root` and classify the repository from the first matching manifest.
pub fn classify_repository(root: &Path, walk: &WalkConfig) -> Classification {
    for entry in walk_tree(root, walk) {
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        let file_names = match list_file_names(dir) {
            Ok(names) => names,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        if let Some(language) = inspect_directory(dir, &file_names) {
            tracing::info!(dir = %dir.display(), %language, "MCP manifest evidence found");
            return Classification::matched(language, dir);
        }
    }

    tracing::info!(root = %root.display(), "no MCP manifest evidence found");
    Classification::default()
}

/// Apply the manifest rules to one directory.
///
/// `file_names` are the non-directory entries of `dir`. Python manifests are
/// checked first; if they carry no marker the package manifest in the same
/// directory still gets its turn.
pub fn inspect_directory(dir: &Path, file_names: &[String]) -> Option<Language> {
    let has = |name: &str| file_names.iter().any(|f| f == name);

    if has(REQUIREMENTS_TXT) || has(PYPROJECT_TOML) {
        let mut parts = Vec::new();
        for name in [REQUIREMENTS_TXT, PYPROJECT_TOML] {
            if has(name) {
                if let Some(text) = read_lossy(&dir.join(name)) {
                    parts.push(text);
                }
            }
        }
        if python_manifest_mentions_mcp(&parts.join("\n")) {
            return Some(Language::Python);
        }
    }

    if has(PACKAGE_JSON) {
        let mentions_sdk = read_lossy(&dir.join(PACKAGE_JSON))
            .map(|text| package_json_mentions_sdk(&text))
            .unwrap_or(false);
        if mentions_sdk {
            let has_ts = file_names.iter().any(|f| f.ends_with(".ts"));
            return Some(if has_ts {
                Language::TypeScript
            } else {
                Language::JavaScript
            });
        }
    }

    None
}

/// True when concatenated Python manifest text contains an MCP marker.
pub fn python_manifest_mentions_mcp(text: &str) -> bool {
    PYTHON_MCP_MARKERS.iter().any(|marker| text.contains(marker))
}

/// True when the `dependencies` or `devDependencies` of a `package.json`
/// reference the MCP SDK. Malformed JSON is not evidence.
pub fn package_json_mentions_sdk(text: &str) -> bool {
    let data: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed package.json");
            return false;
        }
    };

    ["dependencies", "devDependencies"].iter().any(|key| {
        let section = match data.get(key) {
            Some(serde_json::Value::Null) | None => return false,
            Some(section) => section,
        };
        serde_json::to_string(section)
            .map(|serialized| serialized.contains(NPM_MCP_SDK))
            .unwrap_or(false)
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn list_file_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        if entry.path().is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

fn read_lossy(path: &Path) -> Option<String> {
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "manifest unreadable");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
