//! Regex-based capability extraction for JavaScript and TypeScript.
//!
//! There is no syntax tree here. Three patterns match the fluent
//! registration calls of the MCP TypeScript SDK directly in the file text:
//!
//! - `.tool("NAME", "DESC")` or `.tool("NAME", { ... description: "DESC" })`
//! - `.prompt(...)` with the same two shapes
//! - `.resource("URI")`
//!
//! This is a heuristic and is kept as one. Arguments passed through variables
//! are missed, and a matching call shape inside a comment or string is
//! reported. Resources carry fixed sentinel names because the handler a URI is
//! bound to cannot be recovered from the call text.

use std::path::Path;

use regex::{Captures, Regex};

use crate::error::{Result, SkipReason};
use crate::extract::{has_extension, Extractor};
use crate::types::{
    Capability, Findings, Language, ResourceCapability, HEURISTIC_RESOURCE_DESCRIPTION,
    HEURISTIC_RESOURCE_NAME,
};

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Call shape shared by `.tool(` and `.prompt(`. `{method}` is substituted.
///
/// Group 1: name. Group 2: literal second argument. Group 3: `description:`
/// inside an options object. The literal form is tried first.
const NAMED_CALL_TEMPLATE: &str = r#"\.{method}\s*\(\s*["']([^"']+)["']\s*,\s*(?:["']([^"']+)["']|\{[^}]*description:\s*["']([^"']+)["'])"#;

const RESOURCE_PATTERN: &str = r#"\.resource\s*\(\s*["']([^"']+)["']"#;

fn named_call_pattern(method: &str) -> String {
    NAMED_CALL_TEMPLATE.replace("{method}", method)
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Text-pattern extractor for JavaScript/TypeScript MCP servers.
pub struct HeuristicExtractor {
    tool: Regex,
    prompt: Regex,
    resource: Regex,
}

impl HeuristicExtractor {
    /// Compile the three patterns.
    pub fn new() -> Result<Self> {
        Ok(Self {
            tool: Regex::new(&named_call_pattern("tool"))?,
            prompt: Regex::new(&named_call_pattern("prompt"))?,
            resource: Regex::new(RESOURCE_PATTERN)?,
        })
    }

    fn named_calls(pattern: &Regex, source: &str, file_name: &str) -> Vec<Capability> {
        pattern
            .captures_iter(source)
            .filter_map(|caps| {
                let name = caps.get(1)?.as_str();
                Some(Capability::new(name, description_of(&caps), file_name))
            })
            .collect()
    }
}

/// Literal second argument if matched, else the options-object description.
fn description_of(caps: &Captures<'_>) -> String {
    caps.get(2)
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

impl Extractor for HeuristicExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn accepts(&self, path: &Path) -> bool {
        has_extension(path, Language::TypeScript.source_extensions())
    }

    fn extract(&self, source: &str, file_name: &str) -> std::result::Result<Findings, SkipReason> {
        let mut findings = Findings::default();

        findings.tools = Self::named_calls(&self.tool, source, file_name);

        for caps in self.resource.captures_iter(source) {
            let Some(uri) = caps.get(1) else { continue };
            findings.push_resource(ResourceCapability::new(
                uri.as_str(),
                Capability::new(
                    HEURISTIC_RESOURCE_NAME,
                    HEURISTIC_RESOURCE_DESCRIPTION,
                    file_name,
                ),
            ));
        }

        findings.prompts = Self::named_calls(&self.prompt, source, file_name);

        Ok(findings)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
