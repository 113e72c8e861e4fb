//! Decorator-based capability extraction for Python sources.
//!
//! Every `def` (including `async def` and methods) is visited in source
//! order. Each decorator on it is unwrapped into its terminal name plus an
//! [`Invocation`], and the terminal name decides what gets recorded:
//!
//! | decorator          | record                                          |
//! |--------------------|-------------------------------------------------|
//! | `@x.tool(...)`     | tool, `name=` overrides the function name       |
//! | `@x.prompt(...)`   | prompt, same naming rule                        |
//! | `@x.resource(uri)` | resource or template, URI defaults to func name |
//!
//! Only literal strings count as arguments; f-strings, bytes, names and calls
//! are treated as if the argument were absent.
//!
//! `async def` handlers are catalogued like plain ones. Scanners that only
//! look at synchronous `FunctionDef` nodes will report fewer capabilities for
//! async servers.

use std::path::Path;

use tree_sitter::Node;

use crate::error::SkipReason;
use crate::extract::parser::SourceParser;
use crate::extract::{has_extension, Extractor};
use crate::types::{Capability, Findings, Language, ResourceCapability, NO_DESCRIPTION};

// ---------------------------------------------------------------------------
// Decorator model
// ---------------------------------------------------------------------------

/// How a decorator was applied.
#[derive(Debug)]
enum Invocation<'t> {
    /// `@server.tool`
    Bare,
    /// `@server.tool(...)`
    Invoked {
        positional: Vec<Node<'t>>,
        keyword: Vec<(String, Node<'t>)>,
    },
}

/// A decorator reduced to what the extractor dispatches on.
#[derive(Debug)]
struct Decorator<'t> {
    /// Rightmost identifier of the decorator callee (`tool` for `@mcp.tool()`).
    kind: String,
    invocation: Invocation<'t>,
}

impl<'t> Decorator<'t> {
    fn from_node(node: Node<'t>, src: &[u8]) -> Option<Self> {
        let expr = named_children(node).into_iter().next()?;
        let (callee, invocation) = if expr.kind() == "call" {
            let callee = expr.child_by_field_name("function")?;
            (callee, Invocation::from_arguments(expr.child_by_field_name("arguments"), src))
        } else {
            (expr, Invocation::Bare)
        };
        Some(Self {
            kind: terminal_name(callee, src).unwrap_or_default(),
            invocation,
        })
    }

    /// Literal string value of keyword argument `key`, if present.
    fn keyword_literal(&self, key: &str, src: &[u8]) -> Option<String> {
        match &self.invocation {
            Invocation::Bare => None,
            Invocation::Invoked { keyword, .. } => keyword
                .iter()
                .rev()
                .find(|(name, _)| name == key)
                .and_then(|(_, value)| string_literal(*value, src)),
        }
    }

    /// Literal string value of the first positional argument, if it is one.
    fn first_positional_literal(&self, src: &[u8]) -> Option<String> {
        match &self.invocation {
            Invocation::Bare => None,
            Invocation::Invoked { positional, .. } => positional
                .first()
                .and_then(|value| string_literal(*value, src)),
        }
    }
}

impl<'t> Invocation<'t> {
    fn from_arguments(arguments: Option<Node<'t>>, src: &[u8]) -> Self {
        let mut positional = Vec::new();
        let mut keyword = Vec::new();

        match arguments {
            Some(args) if args.kind() == "argument_list" => {
                for arg in named_children(args) {
                    match arg.kind() {
                        "keyword_argument" => {
                            let name = arg
                                .child_by_field_name("name")
                                .and_then(|n| n.utf8_text(src).ok());
                            if let (Some(name), Some(value)) =
                                (name, arg.child_by_field_name("value"))
                            {
                                keyword.push((name.to_string(), value));
                            }
                        }
                        // `**options` never yields a literal keyword
                        "dictionary_splat" => {}
                        _ => positional.push(arg),
                    }
                }
            }
            // `@deco(x for x in y)`
            Some(other) => positional.push(other),
            None => {}
        }

        Self::Invoked {
            positional,
            keyword,
        }
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Syntax-tree extractor for Python MCP servers.
pub struct PythonExtractor {
    parser: SourceParser,
}

impl PythonExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: SourceParser::new(),
        }
    }

    fn extract_function(&self, function: Node<'_>, src: &[u8], file_name: &str, out: &mut Findings) {
        let decorators = decorator_nodes(function);
        if decorators.is_empty() {
            return;
        }
        let Some(func_name) = function
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(src).ok())
        else {
            return;
        };

        let default_description = docstring(function, src)
            .map(|doc| doc.trim().to_string())
            .filter(|doc| !doc.is_empty())
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        for node in decorators {
            let Some(decorator) = Decorator::from_node(node, src) else {
                continue;
            };
            let description = decorator
                .keyword_literal("description", src)
                .unwrap_or_else(|| default_description.clone());

            match decorator.kind.as_str() {
                "tool" | "prompt" => {
                    let name = decorator
                        .keyword_literal("name", src)
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| func_name.to_string());
                    let capability = Capability::new(name, description, file_name);
                    if decorator.kind == "tool" {
                        out.tools.push(capability);
                    } else {
                        out.prompts.push(capability);
                    }
                }
                "resource" => {
                    let uri = decorator
                        .first_positional_literal(src)
                        .unwrap_or_else(|| func_name.to_string());
                    out.push_resource(ResourceCapability::new(
                        uri,
                        Capability::new(func_name, description, file_name),
                    ));
                }
                _ => {}
            }
        }
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PythonExtractor {
    fn name(&self) -> &'static str {
        "python"
    }

    fn accepts(&self, path: &Path) -> bool {
        has_extension(path, Language::Python.source_extensions())
    }

    fn extract(&self, source: &str, file_name: &str) -> Result<Findings, SkipReason> {
        let tree = self.parser.parse_python(source)?;
        let src = source.as_bytes();

        let mut findings = Findings::default();
        for function in function_definitions(tree.root_node()) {
            self.extract_function(function, src, file_name, &mut findings);
        }
        Ok(findings)
    }
}

// ---------------------------------------------------------------------------
// Tree helpers
// ---------------------------------------------------------------------------

/// Named children of `node`, comments excluded.
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Every `function_definition` under `root`, in source order.
fn function_definitions(root: Node<'_>) -> Vec<Node<'_>> {
    let mut found = Vec::new();
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.kind() == "function_definition" {
            found.push(node);
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return found;
            }
        }
    }
}

/// The `decorator` nodes attached to a function, top to bottom.
fn decorator_nodes(function: Node<'_>) -> Vec<Node<'_>> {
    let Some(parent) = function.parent() else {
        return Vec::new();
    };
    if parent.kind() != "decorated_definition" {
        return Vec::new();
    }
    named_children(parent)
        .into_iter()
        .filter(|child| child.kind() == "decorator")
        .collect()
}

/// Rightmost identifier of a callee: `tool` for `mcp.tool`, `tool` for `tool`.
fn terminal_name(callee: Node<'_>, src: &[u8]) -> Option<String> {
    let token = match callee.kind() {
        "identifier" => callee,
        "attribute" => callee.child_by_field_name("attribute")?,
        _ => return None,
    };
    token.utf8_text(src).ok().map(str::to_string)
}

/// Cleaned docstring of a function, when its body opens with a string literal.
fn docstring(function: Node<'_>, src: &[u8]) -> Option<String> {
    let body = function.child_by_field_name("body")?;
    let first = named_children(body).into_iter().next()?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let exprs = named_children(first);
    if exprs.len() != 1 {
        return None;
    }
    string_literal(exprs[0], src).map(|doc| clean_docstring(&doc))
}

// ---------------------------------------------------------------------------
// Literals
// ---------------------------------------------------------------------------

/// Value of a plain string literal node, or `None` for anything that is not
/// a compile-time `str` constant.
fn string_literal(node: Node<'_>, src: &[u8]) -> Option<String> {
    match node.kind() {
        "string" => decode_string(node, src),
        "concatenated_string" => {
            let mut joined = String::new();
            for part in named_children(node) {
                joined.push_str(&decode_string(part, src)?);
            }
            Some(joined)
        }
        "parenthesized_expression" => {
            let inner = named_children(node);
            match inner.as_slice() {
                [only] => string_literal(*only, src),
                _ => None,
            }
        }
        _ => None,
    }
}

fn decode_string(node: Node<'_>, src: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }

    let mut prefix = String::new();
    let mut body = String::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "string_start" => {
                prefix = child
                    .utf8_text(src)
                    .ok()?
                    .chars()
                    .take_while(char::is_ascii_alphabetic)
                    .collect::<String>()
                    .to_ascii_lowercase();
            }
            "string_content" | "escape_sequence" => body.push_str(child.utf8_text(src).ok()?),
            "interpolation" => return None,
            _ => {}
        }
    }

    // f-strings, t-strings and bytes are not `str` constants
    if prefix.contains(|c| matches!(c, 'f' | 't' | 'b')) {
        return None;
    }
    if prefix.contains('r') {
        Some(body)
    } else {
        Some(unescape(&body))
    }
}

/// Resolve Python backslash escapes, including `\\N{NAME}`. Unknown escapes
/// and unknown character names are kept verbatim.
pub(crate) fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            out.push('\\');
            break;
        };
        match next {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' | '\'' | '"' => out.push(next),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0c'),
            'v' => out.push('\x0b'),
            '0'..='7' => {
                let mut digits = String::from(next);
                while digits.len() < 3 {
                    match chars.peek() {
                        Some(d @ '0'..='7') => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&digits, 8).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push_str(&digits);
                    }
                }
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let mut digits = String::new();
                while digits.len() < width {
                    match chars.peek() {
                        Some(d) if d.is_ascii_hexdigit() => {
                            digits.push(*d);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                let decoded = (digits.len() == width)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(next);
                        out.push_str(&digits);
                    }
                }
            }
            'N' if chars.peek() == Some(&'{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                match unicode_names2::character(&name).filter(|_| closed) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\N{");
                        out.push_str(&name);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    out
}

/// Normalize docstring indentation the way `inspect.cleandoc` does: tabs
/// expanded, first line left-stripped, the common margin of the remaining
/// lines removed, blank lines dropped from both ends.
pub(crate) fn clean_docstring(doc: &str) -> String {
    let expanded = expand_tabs(doc, 8);
    let lines: Vec<&str> = expanded.split('\n').collect();

    let margin = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let content = line.trim_start();
            (!content.is_empty())
                .then(|| line.chars().count() - content.chars().count())
        })
        .min();

    let mut cleaned: Vec<String> = Vec::with_capacity(lines.len());
    cleaned.push(lines[0].trim_start().to_string());
    for line in lines.iter().skip(1) {
        cleaned.push(match margin {
            Some(margin) => line.chars().skip(margin).collect(),
            None => (*line).to_string(),
        });
    }

    while cleaned.last().is_some_and(String::is_empty) {
        cleaned.pop();
    }
    let leading = cleaned.iter().take_while(|line| line.is_empty()).count();
    cleaned.drain(..leading);

    cleaned.join("\n")
}

fn expand_tabs(text: &str, tab_size: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = tab_size - (column % tab_size);
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
