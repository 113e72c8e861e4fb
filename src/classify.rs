//! Static vs. templated resource classification.
//!
//! A resource is a template when its URI contains both `{` and `}` anywhere.
//! Order and pairing are deliberately not checked: `"odd}{case"` is a
//! template, and consumers rely on that.

use serde::{Deserialize, Serialize};

/// Which resource listing a URI belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Static,
    Template,
}

/// True when `uri` contains both placeholder delimiters.
#[must_use]
pub fn is_template(uri: &str) -> bool {
    uri.contains('{') && uri.contains('}')
}

#[must_use]
pub fn classify(uri: &str) -> ResourceKind {
    if is_template(uri) {
        ResourceKind::Template
    } else {
        ResourceKind::Static
    }
}
