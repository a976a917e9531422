use super::{FileSystemProvider, now_millis};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tagscope_api::{DirEntry, FileKind, FileStat};

#[derive(Default)]
struct MemoryState {
    contents: HashMap<PathBuf, String>,
    stats: HashMap<PathBuf, FileStat>,
    listings: HashMap<PathBuf, Vec<DirEntry>>,
}

/// In-memory view fed by whoever holds the files: the editor's open
/// documents, or a client streaming a remote workspace.
///
/// Directory existence and listings are inferred from the stored paths when
/// no explicit listing was provided.
#[derive(Default)]
pub struct MemoryFileSystem {
    state: RwLock<MemoryState>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_content(&self, path: &Path, content: impl Into<String>) {
        self.write().contents.insert(path.to_path_buf(), content.into());
    }

    pub fn update_stat(&self, path: &Path, stat: FileStat) {
        self.write().stats.insert(path.to_path_buf(), stat);
    }

    pub fn update_directory_listing(&self, path: &Path, entries: Vec<DirEntry>) {
        self.write().listings.insert(path.to_path_buf(), entries);
    }

    /// Store a document: content, a fresh file stat, and every parent
    /// directory with a listing entry for its child.
    pub fn sync_document(&self, path: &Path, content: &str) {
        let now = now_millis();
        let mut state = self.write();
        state.contents.insert(path.to_path_buf(), content.to_string());
        state
            .stats
            .insert(path.to_path_buf(), FileStat::file(now, content.len() as u64));

        let mut child = path.to_path_buf();
        let mut child_kind = FileKind::File;
        while let Some(parent) = child.parent() {
            if parent.as_os_str().is_empty() {
                break;
            }
            let Some(name) = child.file_name().and_then(|n| n.to_str()) else {
                break;
            };
            let entry = DirEntry {
                name: name.to_string(),
                kind: child_kind,
                path: child.clone(),
            };
            let listing = state.listings.entry(parent.to_path_buf()).or_default();
            if !listing.iter().any(|e| e.name == entry.name) {
                listing.push(entry);
            }
            state
                .stats
                .entry(parent.to_path_buf())
                .or_insert_with(|| FileStat::directory(now));

            child = parent.to_path_buf();
            child_kind = FileKind::Directory;
        }
    }

    /// Drop a path and everything below it.
    pub fn remove_path(&self, path: &Path) {
        let mut state = self.write();
        state.contents.retain(|p, _| !p.starts_with(path));
        state.stats.retain(|p, _| !p.starts_with(path));
        state.listings.retain(|p, _| !p.starts_with(path));
        if let Some(parent) = path.parent() {
            if let Some(listing) = state.listings.get_mut(parent) {
                listing.retain(|e| e.path != path);
            }
        }
    }

    /// Number of existing files, used to detect when arrivals settle.
    pub fn known_file_count(&self) -> usize {
        self.read().stats.values().filter(|s| s.is_file()).count()
    }

    fn infer_directory(state: &MemoryState, path: &Path) -> bool {
        if state.listings.contains_key(path) {
            return true;
        }
        state
            .stats
            .keys()
            .chain(state.contents.keys())
            .any(|p| p != path && p.starts_with(path))
    }

    fn infer_listing(state: &MemoryState, path: &Path) -> Vec<DirEntry> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let mut known: Vec<&PathBuf> = state.stats.keys().chain(state.contents.keys()).collect();
        known.sort();

        for candidate in known {
            // Direct children only
            if candidate.parent() != Some(path) {
                continue;
            }
            let Some(name) = candidate.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let kind = match state.stats.get(candidate) {
                Some(stat) if !stat.exists => continue,
                Some(stat) => stat.kind,
                None if Self::infer_directory(state, candidate) => FileKind::Directory,
                None => FileKind::File,
            };
            if seen.insert(name.to_string()) {
                entries.push(DirEntry {
                    name: name.to_string(),
                    kind,
                    path: candidate.clone(),
                });
            }
        }

        // Nested paths whose intermediate directories were never registered
        let mut nested: Vec<PathBuf> = state
            .stats
            .keys()
            .chain(state.contents.keys())
            .filter_map(|p| {
                let rel = p.strip_prefix(path).ok()?;
                let first = rel.components().next()?;
                let child = path.join(first);
                (child != *p).then_some(child)
            })
            .collect();
        nested.sort();
        for child in nested {
            let Some(name) = child.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if seen.insert(name.to_string()) {
                entries.push(DirEntry {
                    name: name.to_string(),
                    kind: FileKind::Directory,
                    path: child.clone(),
                });
            }
        }
        entries
    }
}

#[async_trait]
impl FileSystemProvider for MemoryFileSystem {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn content(&self, path: &Path) -> Option<String> {
        self.read().contents.get(path).cloned()
    }

    async fn stat(&self, path: &Path) -> Option<FileStat> {
        let state = self.read();
        if let Some(stat) = state.stats.get(path) {
            return Some(*stat);
        }
        if let Some(content) = state.contents.get(path) {
            return Some(FileStat::file(0, content.len() as u64));
        }
        Self::infer_directory(&state, path).then(|| FileStat::directory(0))
    }

    async fn directory_listing(&self, path: &Path) -> Vec<DirEntry> {
        let state = self.read();
        match state.listings.get(path) {
            Some(listing) if !listing.is_empty() => listing.clone(),
            _ => Self::infer_listing(&state, path),
        }
    }

    async fn update_content(&self, path: &Path, content: &str) -> Result<()> {
        self.sync_document(path, content);
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        self.remove_path(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sync_document_creates_parent_directories() {
        let fs = MemoryFileSystem::new();
        fs.sync_document(Path::new("/ws/src/components/button.js"), "export default 1;");

        for dir in ["/ws", "/ws/src", "/ws/src/components"] {
            assert!(
                fs.stat(Path::new(dir)).await.is_some_and(|s| s.is_dir()),
                "{dir}"
            );
        }
        let listing = fs.directory_listing(Path::new("/ws/src/components")).await;
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "button.js");
        assert!(listing[0].is_file());
    }

    #[tokio::test]
    async fn syncing_twice_updates_content_without_duplicate_entries() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/ws/src/file.js");
        fs.sync_document(path, "short");
        fs.sync_document(path, "much longer content");

        assert_eq!(fs.content(path).await.as_deref(), Some("much longer content"));
        assert_eq!(fs.stat(path).await.map(|s| s.size), Some(19));
        assert_eq!(fs.directory_listing(Path::new("/ws/src")).await.len(), 1);
    }

    #[tokio::test]
    async fn listing_is_inferred_from_stats() {
        let fs = MemoryFileSystem::new();
        fs.update_stat(Path::new("/ws/a.js"), FileStat::file(1, 1));
        fs.update_stat(Path::new("/ws/b/c.js"), FileStat::file(1, 1));
        fs.update_stat(Path::new("/ws/gone.js"), FileStat {
            exists: false,
            kind: FileKind::File,
            mtime: 0,
            size: 0,
        });

        let listing = fs.directory_listing(Path::new("/ws")).await;
        let names: Vec<_> = listing.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.js", "b"]);
        assert!(listing[1].is_dir());
        assert_eq!(fs.known_file_count(), 2);
    }

    #[tokio::test]
    async fn remove_path_drops_children_and_parent_entry() {
        let fs = MemoryFileSystem::new();
        fs.sync_document(Path::new("/ws/lwc/foo/foo.js"), "a");
        fs.sync_document(Path::new("/ws/lwc/foo/foo.html"), "b");
        fs.sync_document(Path::new("/ws/lwc/bar/bar.js"), "c");

        fs.remove_path(Path::new("/ws/lwc/foo"));

        assert!(!fs.exists(Path::new("/ws/lwc/foo/foo.js")).await);
        let names: Vec<_> = fs
            .directory_listing(Path::new("/ws/lwc"))
            .await
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["bar"]);
        assert_eq!(fs.known_file_count(), 1);
    }
}
