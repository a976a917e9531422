use super::{DiscoveryEntry, is_component_module};
use crate::fs::{FileSystemProvider, is_relevant_path};
use std::collections::HashSet;
use std::path::PathBuf;

/// Walks a file-system view for component modules.
pub struct Scanner<'a> {
    view: &'a dyn FileSystemProvider,
    container: &'a str,
}

impl<'a> Scanner<'a> {
    /// `container` is the directory name component bundles must live under
    /// (`lwc`, `modules`).
    pub fn new(view: &'a dyn FileSystemProvider, container: &'a str) -> Self {
        Self { view, container }
    }

    /// Component modules below any of `roots`, sorted by path.
    pub async fn discover(&self, roots: &[PathBuf]) -> Vec<DiscoveryEntry> {
        let mut entries = Vec::new();
        let mut visited = HashSet::new();
        let mut stack: Vec<(PathBuf, bool)> = roots.iter().map(|r| (r.clone(), false)).collect();

        while let Some((dir, in_container)) = stack.pop() {
            if !visited.insert(dir.clone()) {
                continue;
            }
            for entry in self.view.directory_listing(&dir).await {
                if entry.is_dir() {
                    if is_relevant_path(&entry.path) {
                        let inside = in_container || entry.name == self.container;
                        stack.push((entry.path, inside));
                    }
                    continue;
                }
                if !in_container || !is_component_module(&entry.path) {
                    continue;
                }
                match self.view.stat(&entry.path).await {
                    Some(stat) if stat.is_file() => {
                        entries.push(DiscoveryEntry::new(entry.path, stat.mtime));
                    }
                    _ => tracing::debug!("Skipping {}: no stat", entry.path.display()),
                }
            }
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries.dedup_by(|a, b| a.path == b.path);
        entries
    }
}
