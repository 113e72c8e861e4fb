//! Core domain types for the scanner.
//!
//! A scan produces one [`ScanResult`]. Extractors never touch it directly:
//! each file yields a [`Findings`] bundle which the scanner absorbs in
//! file-visitation order. Records are append-only for the lifetime of a scan.

use serde::{Deserialize, Serialize};

use crate::classify::{classify, ResourceKind};

/// Description used when a declaration has neither a docstring nor an
/// explicit `description=` override.
pub const NO_DESCRIPTION: &str = "No description";

/// Name given to resources found by the text heuristics, which cannot see the
/// handler a URI is bound to.
pub const HEURISTIC_RESOURCE_NAME: &str = "Unknown (Regex Limit)";

/// Description given to resources found by the text heuristics.
pub const HEURISTIC_RESOURCE_DESCRIPTION: &str = "Detected via regex";

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Implementation language family detected from manifest evidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Unknown,
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
        }
    }

    /// Parse from a loose string (case-insensitive, short aliases accepted).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unknown" | "none" => Some(Self::Unknown),
            "python" | "py" => Some(Self::Python),
            "javascript" | "js" => Some(Self::JavaScript),
            "typescript" | "ts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// File extensions (with the dot) whose sources are scanned for this
    /// language family.
    pub fn source_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Unknown => &[],
            Self::Python => &[".py"],
            Self::JavaScript | Self::TypeScript => &[".js", ".ts"],
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// A tool or prompt declared by the scanned repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    pub name: String,
    pub description: String,
    /// File name the declaration was found in (no directory component).
    pub source_file: String,
}

impl Capability {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        source_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            source_file: source_file.into(),
        }
    }
}

/// A resource declaration: a [`Capability`] plus the URI it is addressed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCapability {
    pub uri_pattern: String,
    #[serde(flatten)]
    pub capability: Capability,
}

impl ResourceCapability {
    pub fn new(uri_pattern: impl Into<String>, capability: Capability) -> Self {
        Self {
            uri_pattern: uri_pattern.into(),
            capability,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        classify(&self.uri_pattern)
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// Capabilities recovered from one file (or merged from several).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    pub tools: Vec<Capability>,
    pub prompts: Vec<Capability>,
    pub resources: Vec<ResourceCapability>,
    pub resource_templates: Vec<ResourceCapability>,
}

impl Findings {
    /// Append a resource to `resources` or `resource_templates` depending on
    /// its URI.
    pub fn push_resource(&mut self, resource: ResourceCapability) {
        match resource.kind() {
            ResourceKind::Static => self.resources.push(resource),
            ResourceKind::Template => self.resource_templates.push(resource),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.tools.len() + self.prompts.len() + self.resources.len() + self.resource_templates.len()
    }
}

// ---------------------------------------------------------------------------
// ScanResult
// ---------------------------------------------------------------------------

/// The outcome of scanning one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub is_mcp_repository: bool,
    pub language: Language,
    pub tools: Vec<Capability>,
    pub prompts: Vec<Capability>,
    pub resources: Vec<ResourceCapability>,
    pub resource_templates: Vec<ResourceCapability>,
}

impl ScanResult {
    /// A negative result: no manifest evidence, nothing extracted.
    pub fn not_mcp() -> Self {
        Self::default()
    }

    /// A positive classification with no findings yet.
    pub fn classified(language: Language) -> Self {
        Self {
            is_mcp_repository: true,
            language,
            ..Self::default()
        }
    }

    /// Append one file's findings.
    pub fn absorb(&mut self, findings: Findings) {
        self.tools.extend(findings.tools);
        self.prompts.extend(findings.prompts);
        self.resources.extend(findings.resources);
        self.resource_templates.extend(findings.resource_templates);
    }

    pub fn capability_count(&self) -> usize {
        self.tools.len() + self.prompts.len() + self.resources.len() + self.resource_templates.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
