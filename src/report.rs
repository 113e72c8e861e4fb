//! Report aggregation and rendering.
//!
//! [`ScanReport`] is a serializable snapshot of a [`ScanResult`]: the same
//! listings in the same order, plus per-category counts. Renderers turn it
//! into terminal text, JSON, or YAML.

use serde::{Deserialize, Serialize};

use crate::config::OutputFormat;
use crate::error::Result;
use crate::types::{Capability, Language, ResourceCapability, ScanResult};

/// Width of the rule printed under the report header.
const RULE_WIDTH: usize = 40;

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Number of records in each category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityCounts {
    pub tools: usize,
    pub prompts: usize,
    pub resources: usize,
    pub resource_templates: usize,
    pub total: usize,
}

/// Serializable snapshot of one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    pub is_mcp_repository: bool,
    pub language: Language,
    pub counts: CapabilityCounts,
    pub tools: Vec<Capability>,
    pub prompts: Vec<Capability>,
    pub resources: Vec<ResourceCapability>,
    pub resource_templates: Vec<ResourceCapability>,
}

impl ScanReport {
    pub fn from_result(result: &ScanResult) -> Self {
        Self {
            is_mcp_repository: result.is_mcp_repository,
            language: result.language,
            counts: CapabilityCounts {
                tools: result.tools.len(),
                prompts: result.prompts.len(),
                resources: result.resources.len(),
                resource_templates: result.resource_templates.len(),
                total: result.capability_count(),
            },
            tools: result.tools.clone(),
            prompts: result.prompts.clone(),
            resources: result.resources.clone(),
            resource_templates: result.resource_templates.clone(),
        }
    }
}

impl From<&ScanResult> for ScanReport {
    fn from(result: &ScanResult) -> Self {
        Self::from_result(result)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render `report` in `format`. `styled` only affects text output.
pub fn render(report: &ScanReport, format: OutputFormat, styled: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, styled)),
        OutputFormat::Json => render_json(report),
        OutputFormat::Yaml => render_yaml(report),
    }
}

pub fn render_json(report: &ScanReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

pub fn render_yaml(report: &ScanReport) -> Result<String> {
    Ok(serde_yaml::to_string(report)?)
}

/// Terminal listing: header, then tools and prompts by name and resources by
/// URI, each section headed by its count.
pub fn render_text(report: &ScanReport, styled: bool) -> String {
    let heading = |text: String| {
        if styled {
            console::style(text).bold().force_styling(true).to_string()
        } else {
            text
        }
    };

    let mut out = String::new();
    out.push_str(&format!("IS MCP Server: {}\n", report.is_mcp_repository));
    out.push_str(&format!("Language: {}\n", report.language));
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');

    let sections: [(String, Vec<&str>); 4] = [
        (
            format!("TOOLS ({}):", report.counts.tools),
            report.tools.iter().map(|t| t.name.as_str()).collect(),
        ),
        (
            format!("RESOURCES (Static) ({}):", report.counts.resources),
            report.resources.iter().map(|r| r.uri_pattern.as_str()).collect(),
        ),
        (
            format!(
                "RESOURCE TEMPLATES (Dynamic) ({}):",
                report.counts.resource_templates
            ),
            report
                .resource_templates
                .iter()
                .map(|r| r.uri_pattern.as_str())
                .collect(),
        ),
        (
            format!("PROMPTS ({}):", report.counts.prompts),
            report.prompts.iter().map(|p| p.name.as_str()).collect(),
        ),
    ];

    for (i, (title, entries)) in sections.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&heading(title));
        out.push('\n');
        for entry in entries {
            out.push_str(" - ");
            out.push_str(entry);
            out.push('\n');
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
