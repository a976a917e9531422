//! Discovery and change detection for component modules.

pub mod compiler;
pub mod scanner;

use crate::model::Tag;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub use compiler::BatchCompiler;
pub use scanner::Scanner;

const MODULE_EXTENSIONS: [&str; 2] = ["js", "ts"];

/// A module found on the current scan. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DiscoveryEntry {
    pub path: PathBuf,
    pub mtime: u64,
}

impl DiscoveryEntry {
    pub fn new(path: impl Into<PathBuf>, mtime: u64) -> Self {
        Self {
            path: path.into(),
            mtime,
        }
    }
}

/// A component module is a `.js`/`.ts` file whose stem matches its parent
/// directory name (`foo/foo.js`).
pub fn is_component_module(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    if !MODULE_EXTENSIONS.contains(&ext) {
        return false;
    }
    let stem = path.file_stem().and_then(|s| s.to_str());
    let parent = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str());
    stem.is_some() && stem == parent
}

/// Entries no tag accounts for: new files, or files whose mtime differs from
/// the recorded one. Only exact equality counts as indexed.
pub fn unindexed_files<'a, I>(entries: &'a [DiscoveryEntry], tags: I) -> Vec<&'a DiscoveryEntry>
where
    I: IntoIterator<Item = &'a Tag>,
{
    let recorded: HashMap<&Path, u64> = tags
        .into_iter()
        .map(|tag| (tag.file(), tag.updated_at()))
        .collect();
    entries
        .iter()
        .filter(|entry| recorded.get(entry.path.as_path()) != Some(&entry.mtime))
        .collect()
}

/// Tags whose file was not seen by the scan.
pub fn stale_tags<'a, I>(tags: I, entries: &[DiscoveryEntry]) -> Vec<&'a Tag>
where
    I: IntoIterator<Item = &'a Tag>,
{
    let seen: HashSet<&Path> = entries.iter().map(|e| e.path.as_path()).collect();
    tags.into_iter()
        .filter(|tag| !seen.contains(tag.file()))
        .collect()
}
