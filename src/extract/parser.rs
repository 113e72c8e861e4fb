//! Native tree-sitter parser wrapper.
//!
//! Only the Python grammar is linked: it is the one family the scanner
//! extracts from a syntax tree. JavaScript and TypeScript go through the
//! text heuristics in [`super::heuristic`] instead.
//!
//! `SourceParser` carries no fields. Tree-sitter's `Parser` is `!Send`, so a
//! fresh parser is created on every call; `Parser::new()` is a single
//! allocation and `set_language` is a pointer swap. This keeps the wrapper
//! usable from rayon workers.

use crate::error::SkipReason;

/// Thin wrapper around native tree-sitter parsing for Python sources.
pub struct SourceParser;

impl SourceParser {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse Python `content` into a concrete syntax tree.
    ///
    /// A tree that contains error or missing nodes is rejected with
    /// [`SkipReason::Syntax`]: a file that is not valid Python contributes
    /// nothing. The grammar is looser than CPython's compiler, so some
    /// sources it would reject (Python 2 `print 'x'`, repeated keyword
    /// arguments) still parse.
    pub fn parse_python(&self, content: &str) -> Result<tree_sitter::Tree, SkipReason> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&Self::python_language())
            .map_err(|e| SkipReason::Grammar(format!("Language version mismatch: {e}")))?;

        let tree = parser.parse(content, None).ok_or_else(|| {
            SkipReason::Grammar("tree-sitter returned None (timeout or cancellation)".into())
        })?;

        if tree.root_node().has_error() {
            return Err(SkipReason::Syntax);
        }
        Ok(tree)
    }

    /// The statically linked Python grammar.
    #[must_use]
    pub fn python_language() -> tree_sitter::Language {
        tree_sitter_python::LANGUAGE.into()
    }
}

impl Default for SourceParser {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
