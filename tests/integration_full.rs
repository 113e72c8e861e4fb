//! Full end-to-end integration tests for mcpscan.
//!
//! These tests create temporary repositories with real manifests and source
//! files, run the scanner, and verify the resulting capability catalog.

use mcpscan::config::ScannerConfig;
use mcpscan::report::{render_text, ScanReport};
use mcpscan::types::{
    Capability, Language, ScanResult, HEURISTIC_RESOURCE_DESCRIPTION, HEURISTIC_RESOURCE_NAME,
    NO_DESCRIPTION,
};
use mcpscan::Scanner;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a temp repository with the given files and scan it.
fn scan_repo(files: &[(&str, &str)]) -> (TempDir, ScanResult) {
    let dir = repo(files);
    let result = Scanner::new(ScannerConfig::default())
        .unwrap()
        .scan(dir.path());
    (dir, result)
}

fn repo(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        let full_path = dir.path().join(path);
        std::fs::create_dir_all(full_path.parent().unwrap()).unwrap();
        std::fs::write(&full_path, content).unwrap();
    }
    dir
}

const PYPROJECT_WITH_MCP: &str = r#"
[project]
name = "user-service"
dependencies = ["mcp[cli]>=1.2.0", "httpx"]
"#;

const PACKAGE_WITH_SDK: &str = r#"{
  "name": "demo-server",
  "dependencies": { "@modelcontextprotocol/sdk": "^1.5.0", "zod": "^3.23.0" }
}"#;

// ===========================================================================
// 1. Python repositories
// ===========================================================================

#[test]
fn python_resource_template_end_to_end() {
    let server = r#"
from mcp.server.fastmcp import FastMCP

mcp = FastMCP("users")

@mcp.resource("users/{id}")
def get_user(id):
    """Fetch a user by id."""
    return {"id": id}
"#;
    let (_dir, result) = scan_repo(&[
        ("pyproject.toml", PYPROJECT_WITH_MCP),
        ("server.py", server),
    ]);

    assert!(result.is_mcp_repository);
    assert_eq!(result.language, Language::Python);
    assert!(result.resources.is_empty());
    assert!(result.tools.is_empty());
    assert!(result.prompts.is_empty());
    assert_eq!(result.resource_templates.len(), 1);

    let template = &result.resource_templates[0];
    assert_eq!(template.uri_pattern, "users/{id}");
    assert_eq!(template.capability.name, "get_user");
    assert_eq!(template.capability.description, "Fetch a user by id.");
    assert_eq!(template.capability.source_file, "server.py");
}

#[test]
fn python_full_server_catalog() {
    let tools = r#"
from app import mcp

@mcp.tool()
def get_weather(city: str) -> str:
    """Fetches the weather."""
    return "sunny"

@mcp.tool(name="convert", description="Convert units")
async def convert_units(value: float) -> float:
    return value

@mcp.tool
def undocumented():
    pass
"#;
    let resources = r#"
from app import mcp

@mcp.resource("config://app")
def app_config() -> str:
    """Static application config."""
    return "{}"

@mcp.resource("weather://{city}/current")
def current(city: str) -> str:
    return city

@mcp.prompt()
def summarize(text: str) -> str:
    """Summarize the given text."""
    return text
"#;
    let (_dir, result) = scan_repo(&[
        ("requirements.txt", "fastmcp>=2.0\n"),
        ("app/resources.py", resources),
        ("app/tools.py", tools),
    ]);

    assert_eq!(result.language, Language::Python);
    assert_eq!(
        result.tools,
        vec![
            Capability::new("get_weather", "Fetches the weather.", "tools.py"),
            Capability::new("convert", "Convert units", "tools.py"),
            Capability::new("undocumented", NO_DESCRIPTION, "tools.py"),
        ]
    );
    assert_eq!(
        result.prompts,
        vec![Capability::new(
            "summarize",
            "Summarize the given text.",
            "resources.py"
        )]
    );
    assert_eq!(result.resources.len(), 1);
    assert_eq!(result.resources[0].uri_pattern, "config://app");
    assert_eq!(result.resource_templates.len(), 1);
    assert_eq!(
        result.resource_templates[0].uri_pattern,
        "weather://{city}/current"
    );
}

#[test]
fn python_repo_never_scans_js_files() {
    let (_dir, result) = scan_repo(&[
        ("requirements.txt", "mcp\n"),
        ("package.json", PACKAGE_WITH_SDK),
        ("web/index.js", r#"server.tool("js-tool", "Should not appear")"#),
        ("server.py", "@mcp.tool()\ndef py_tool():\n    pass\n"),
    ]);

    assert_eq!(result.language, Language::Python);
    let names: Vec<_> = result.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["py_tool"]);
}

#[test]
fn unparseable_python_file_does_not_abort_scan() {
    let (_dir, result) = scan_repo(&[
        ("requirements.txt", "mcp\n"),
        ("a_broken.py", "@mcp.tool()\ndef broken(:\n    pass\n"),
        ("b_good.py", "@mcp.tool()\ndef good():\n    pass\n"),
    ]);

    assert_eq!(result.tools.len(), 1);
    assert_eq!(result.tools[0].name, "good");
}

// ===========================================================================
// 2. JavaScript / TypeScript repositories
// ===========================================================================

#[test]
fn javascript_tool_end_to_end() {
    let (_dir, result) = scan_repo(&[
        ("package.json", PACKAGE_WITH_SDK),
        ("index.js", r#"server.tool("echo", "Echoes input")"#),
    ]);

    assert!(result.is_mcp_repository);
    assert_eq!(result.language, Language::JavaScript);
    assert_eq!(
        result.tools,
        vec![Capability::new("echo", "Echoes input", "index.js")]
    );
}

#[test]
fn typescript_server_catalog() {
    let server = r#"
import { McpServer, ResourceTemplate } from "@modelcontextprotocol/sdk/server/mcp.js";
import { z } from "zod";

const server = new McpServer({ name: "demo", version: "1.0.0" });

server.tool("add", "Add two numbers", { a: z.number(), b: z.number() }, async ({ a, b }) => ({
  content: [{ type: "text", text: String(a + b) }],
}));

server.tool(
  "search",
  { description: "Search documents", query: z.string() },
  async () => ({ content: [] })
);

server.resource("config", "config://app", async (uri) => ({ contents: [] }));

server.resource(
  "user-profile",
  new ResourceTemplate("users://{userId}/profile", { list: undefined }),
  async () => ({ contents: [] })
);

server.prompt("review-code", "Review code for bugs", { code: z.string() }, ({ code }) => ({
  messages: [],
}));
"#;
    let (_dir, result) = scan_repo(&[
        ("package.json", PACKAGE_WITH_SDK),
        ("index.ts", "export * from './src/server';\n"),
        ("src/server.ts", server),
    ]);

    assert_eq!(result.language, Language::TypeScript);
    let tools: Vec<_> = result
        .tools
        .iter()
        .map(|t| (t.name.as_str(), t.description.as_str()))
        .collect();
    assert_eq!(
        tools,
        [("add", "Add two numbers"), ("search", "Search documents")]
    );

    // Only the first literal argument is captured: these are display names.
    let uris: Vec<_> = result
        .resources
        .iter()
        .map(|r| r.uri_pattern.as_str())
        .collect();
    assert_eq!(uris, ["config", "user-profile"]);
    assert!(result.resource_templates.is_empty());
    assert!(result
        .resources
        .iter()
        .all(|r| r.capability.name == HEURISTIC_RESOURCE_NAME
            && r.capability.description == HEURISTIC_RESOURCE_DESCRIPTION));

    assert_eq!(result.prompts.len(), 1);
    assert_eq!(result.prompts[0].name, "review-code");
    assert_eq!(result.prompts[0].source_file, "server.ts");
}

#[test]
fn dev_dependency_sdk_counts() {
    let package = r#"{"devDependencies": {"@modelcontextprotocol/sdk": "1.0.0"}}"#;
    let (_dir, result) = scan_repo(&[
        ("package.json", package),
        ("lib/resources.js", r#"server.resource("files://{path}")"#),
    ]);

    assert_eq!(result.language, Language::JavaScript);
    assert_eq!(result.resource_templates.len(), 1);
    assert_eq!(result.resource_templates[0].uri_pattern, "files://{path}");
}

#[cfg(unix)]
#[test]
fn unreadable_javascript_sources_are_skipped() {
    let dir = repo(&[
        ("package.json", PACKAGE_WITH_SDK),
        ("c_good.js", r#"server.tool("good", "Works")"#),
    ]);
    std::fs::write(
        dir.path().join("a_latin1.js"),
        b"server.tool(\"latin\", \"caf\xe9\")",
    )
    .unwrap();
    std::os::unix::fs::symlink(dir.path().join("gone.js"), dir.path().join("b_dangling.js"))
        .unwrap();

    let outcome = Scanner::new(ScannerConfig::default())
        .unwrap()
        .scan_detailed(dir.path());

    let names: Vec<_> = outcome.result.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["good"]);
    assert_eq!(outcome.stats.files_examined, 3);
    assert_eq!(outcome.stats.skipped.get("encoding"), Some(&1));
    assert_eq!(outcome.stats.skipped.get("unreadable"), Some(&1));
}

// ===========================================================================
// 3. Negative and degenerate repositories
// ===========================================================================

#[test]
fn repository_without_manifest_is_not_mcp() {
    let (_dir, result) = scan_repo(&[(
        "server.py",
        "@mcp.tool()\ndef would_match():\n    pass\n",
    )]);
    assert_eq!(result, ScanResult::not_mcp());
}

#[test]
fn manifest_without_sdk_is_not_mcp() {
    let (_dir, result) = scan_repo(&[
        ("requirements.txt", "flask\nrequests\n"),
        ("package.json", r#"{"dependencies": {"express": "4"}}"#),
        ("index.js", r#"server.tool("x", "y")"#),
    ]);
    assert!(!result.is_mcp_repository);
    assert_eq!(result.language, Language::Unknown);
    assert_eq!(result.capability_count(), 0);
}

#[test]
fn malformed_package_json_is_ignored() {
    let (_dir, result) = scan_repo(&[
        ("a/package.json", "{ \"dependencies\": "),
        ("b/requirements.txt", "mcp==1.0\n"),
        ("b/server.py", "@mcp.prompt()\ndef p():\n    pass\n"),
    ]);
    assert_eq!(result.language, Language::Python);
    assert_eq!(result.prompts.len(), 1);
}

#[test]
fn empty_directory_scans_cleanly() {
    let dir = TempDir::new().unwrap();
    let result = Scanner::new(ScannerConfig::default())
        .unwrap()
        .scan(dir.path());
    assert_eq!(result, ScanResult::not_mcp());
}

// ===========================================================================
// 4. Idempotence and reporting
// ===========================================================================

#[test]
fn rescanning_is_idempotent() {
    let dir = repo(&[
        ("pyproject.toml", PYPROJECT_WITH_MCP),
        ("a.py", "@mcp.tool()\ndef one():\n    pass\n"),
        ("b/c.py", "@mcp.resource('x://{y}')\ndef two(y):\n    pass\n"),
    ]);
    let scanner = Scanner::new(ScannerConfig::default()).unwrap();

    let first = scanner.scan(dir.path());
    let second = scanner.scan(dir.path());
    assert_eq!(first, second);
    assert_eq!(first.capability_count(), 2);
}

#[test]
fn text_report_lists_capabilities() {
    let (_dir, result) = scan_repo(&[
        ("package.json", PACKAGE_WITH_SDK),
        ("index.js", r#"server.tool("echo", "Echoes input"); server.resource("docs://{slug}");"#),
    ]);

    let text = render_text(&ScanReport::from_result(&result), false);
    assert!(text.contains("IS MCP Server: true"));
    assert!(text.contains("Language: javascript"));
    assert!(text.contains("TOOLS (1):\n - echo\n"));
    assert!(text.contains("RESOURCE TEMPLATES (Dynamic) (1):\n - docs://{slug}\n"));
}
