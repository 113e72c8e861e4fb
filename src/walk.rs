//! Deterministic repository walking shared by manifest detection and
//! extraction.

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::config::WalkConfig;

/// Pre-order walk of `root`, entries sorted by file name, with configured
/// directories pruned. The root itself is never pruned.
pub fn walk_tree<'a>(
    root: &Path,
    walk: &'a WalkConfig,
) -> impl Iterator<Item = DirEntry> + 'a {
    WalkDir::new(root)
        .follow_links(walk.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !walk.is_skipped_dir(&entry.file_name().to_string_lossy())
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable walk entry");
                None
            }
        })
}
