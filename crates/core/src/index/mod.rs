//! Name-addressable component index.
//!
//! Tags live in memory behind an async `RwLock`; the lock is only held to read
//! or merge, never across discovery, compilation or snapshot I/O.

use crate::error::Result;
use crate::fs::FileSystemProvider;
use crate::indexing::{BatchCompiler, DiscoveryEntry, Scanner, stale_tags, unindexed_files};
use crate::model::{Tag, file_uri};
use crate::naming;
use crate::project;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tagscope_api::{ComponentMetadata, MetadataCompiler, WorkspaceType};
use tokio::sync::RwLock;

mod storage;
mod ts_config;

pub use storage::SNAPSHOT_RELATIVE_PATH;
pub use ts_config::{TS_CONFIG_RELATIVE_PATH, TsConfigPaths};

#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub root: PathBuf,
    pub workspace_type: WorkspaceType,
    pub snapshot_path: PathBuf,
}

impl IndexConfig {
    pub fn new(root: impl Into<PathBuf>, workspace_type: WorkspaceType) -> Self {
        let root = root.into();
        let snapshot_path = root.join(SNAPSHOT_RELATIVE_PATH);
        Self {
            root,
            workspace_type,
            snapshot_path,
        }
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }
}

/// Counters reported by `init` / `reindex`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub discovered: usize,
    pub compiled: usize,
    pub removed: usize,
    pub total: usize,
}

/// Files touched through the incremental API while a scan is running. The
/// scan's merge leaves them alone.
#[derive(Default)]
struct ScanState {
    depth: usize,
    edited: HashSet<PathBuf>,
}

pub struct ComponentIndex {
    config: IndexConfig,
    view: Arc<dyn FileSystemProvider>,
    compiler: Arc<dyn MetadataCompiler>,
    tags: RwLock<HashMap<String, Arc<Tag>>>,
    scan: Mutex<ScanState>,
}

impl ComponentIndex {
    pub fn new(
        config: IndexConfig,
        view: Arc<dyn FileSystemProvider>,
        compiler: Arc<dyn MetadataCompiler>,
    ) -> Self {
        Self {
            config,
            view,
            compiler,
            tags: RwLock::new(HashMap::new()),
            scan: Mutex::new(ScanState::default()),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn view(&self) -> &Arc<dyn FileSystemProvider> {
        &self.view
    }

    /// Load the snapshot, compile whatever it does not account for, drop
    /// tags whose file is gone, and persist. Running it twice in a row
    /// changes nothing. A snapshot that cannot be written leaves the merged
    /// tags in place.
    pub async fn init(&self) -> Result<IndexStats> {
        self.load_from_snapshot().await;

        self.begin_scan();
        let entries = self.discover().await;
        let current: Vec<Arc<Tag>> = self.tags.read().await.values().cloned().collect();
        let unindexed = unindexed_files(&entries, current.iter().map(Arc::as_ref));
        tracing::info!(
            "Discovered {} component modules, {} need compiling",
            entries.len(),
            unindexed.len()
        );
        let compiled = BatchCompiler::new(self.view.clone(), self.compiler.clone())
            .compile_batch(&unindexed)
            .await;

        let mut stats = IndexStats {
            discovered: entries.len(),
            compiled: compiled.len(),
            ..Default::default()
        };
        {
            let mut tags = self.tags.write().await;
            let edited = self.end_scan();
            for tag in compiled {
                if edited.contains(tag.file()) {
                    tracing::debug!("Keeping live edit of {}", tag.file().display());
                    continue;
                }
                tags.insert(tag.name().to_string(), Arc::new(tag));
            }

            let stale: Vec<String> = stale_tags(tags.values().map(Arc::as_ref), &entries)
                .into_iter()
                .filter(|tag| !edited.contains(tag.file()))
                .map(|tag| tag.name().to_string())
                .collect();
            for name in &stale {
                tags.remove(name);
            }
            stats.removed = stale.len();
            stats.total = tags.len();
        }

        self.persist_or_warn().await;
        tracing::info!(
            "Index ready: {} components ({} compiled, {} removed)",
            stats.total,
            stats.compiled,
            stats.removed
        );
        Ok(stats)
    }

    /// Rebuild from every discovered module, ignoring what is in memory.
    /// Does not persist.
    pub async fn reindex(&self) -> Result<IndexStats> {
        self.begin_scan();
        let entries = self.discover().await;
        let all: Vec<&DiscoveryEntry> = entries.iter().collect();
        let compiled = BatchCompiler::new(self.view.clone(), self.compiler.clone())
            .compile_batch(&all)
            .await;

        let compiled_count = compiled.len();

        let mut tags = self.tags.write().await;
        let edited = self.end_scan();
        let previous = std::mem::take(&mut *tags);
        for tag in compiled {
            tags.insert(tag.name().to_string(), Arc::new(tag));
        }
        // Live edits made during the rebuild survive it
        for tag in previous.values() {
            if edited.contains(tag.file()) {
                tags.insert(tag.name().to_string(), tag.clone());
            }
        }
        let removed = previous
            .keys()
            .filter(|name| !tags.contains_key(*name))
            .count();
        tracing::info!("Reindexed {} components", tags.len());
        Ok(IndexStats {
            discovered: entries.len(),
            compiled: compiled_count,
            removed,
            total: tags.len(),
        })
    }

    async fn discover(&self) -> Vec<DiscoveryEntry> {
        let view = self.view.as_ref();
        let roots =
            project::source_roots(&self.config.root, self.config.workspace_type, view).await;
        Scanner::new(view, self.config.workspace_type.component_container())
            .discover(&roots)
            .await
    }

    fn begin_scan(&self) {
        let mut scan = self.scan.lock().unwrap_or_else(|e| e.into_inner());
        scan.depth += 1;
    }

    fn end_scan(&self) -> HashSet<PathBuf> {
        let mut scan = self.scan.lock().unwrap_or_else(|e| e.into_inner());
        scan.depth = scan.depth.saturating_sub(1);
        if scan.depth == 0 {
            std::mem::take(&mut scan.edited)
        } else {
            scan.edited.clone()
        }
    }

    fn record_edit(&self, path: &Path) {
        let mut scan = self.scan.lock().unwrap_or_else(|e| e.into_inner());
        if scan.depth > 0 {
            scan.edited.insert(path.to_path_buf());
        }
    }

    /// Resolve a tag reference in any supported dialect.
    pub async fn find_by_name(&self, query: &str) -> Option<Arc<Tag>> {
        let tags = self.tags.read().await;
        let key = naming::resolve(query, |key| tags.contains_key(key))?;
        tags.get(&key).cloned()
    }

    /// Tag owning `uri`. A markup URI maps to its sibling module.
    pub async fn find_by_uri(&self, uri: &str) -> Option<Arc<Tag>> {
        let candidates: Vec<String> = match uri.strip_suffix(".html") {
            Some(base) => vec![format!("{base}.js"), format!("{base}.ts")],
            None => vec![uri.to_string()],
        };
        let tags = self.tags.read().await;
        candidates
            .iter()
            .find_map(|candidate| tags.values().find(|tag| tag.uri() == *candidate))
            .cloned()
    }

    pub async fn find_by_path(&self, path: &Path) -> Option<Arc<Tag>> {
        self.find_by_uri(&file_uri(path)).await
    }

    /// Every tag, sorted by name.
    pub async fn all_tags(&self) -> Vec<Arc<Tag>> {
        let mut all: Vec<_> = self.tags.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name().cmp(b.name()));
        all
    }

    pub async fn len(&self) -> usize {
        self.tags.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tags.read().await.is_empty()
    }

    /// Replace the metadata of the tag for `path`, creating it when absent.
    pub async fn update_metadata(&self, path: &Path, metadata: ComponentMetadata) -> Arc<Tag> {
        self.record_edit(path);
        let name = tag_name(path);
        let existing = self.tags.read().await.get(&name).cloned();

        let tag = match existing {
            Some(existing) if existing.file() == path => {
                let mut tag = (*existing).clone();
                tag.update_metadata(metadata, Some(self.view.as_ref())).await;
                tag
            }
            _ => {
                Tag::create(
                    path.to_path_buf(),
                    Some(metadata),
                    None,
                    Some(self.view.as_ref()),
                )
                .await
            }
        };
        let tag = Arc::new(tag);
        self.tags.write().await.insert(name, tag.clone());
        tag
    }

    /// Recompile one module. A file that no longer yields a tag keeps its
    /// previous entry unless it disappeared from the view.
    pub async fn update_file(&self, path: &Path) -> Option<Arc<Tag>> {
        self.record_edit(path);
        match Tag::from_file(path, self.view.as_ref(), self.compiler.clone(), None).await {
            Some(tag) => {
                let tag = Arc::new(tag);
                tracing::debug!("Updated component {}", tag.name());
                self.tags
                    .write()
                    .await
                    .insert(tag.name().to_string(), tag.clone());
                Some(tag)
            }
            None => {
                if !self.view.exists(path).await {
                    self.remove_file(path).await;
                }
                None
            }
        }
    }

    /// Drop tags for `path`, or for every module below it when it is a
    /// directory. Returns how many were removed.
    pub async fn remove_file(&self, path: &Path) -> usize {
        self.record_edit(path);
        let mut tags = self.tags.write().await;
        let before = tags.len();
        tags.retain(|_, tag| !tag.file().starts_with(path));
        let removed = before - tags.len();
        if removed > 0 {
            tracing::debug!("Removed {} component(s) under {}", removed, path.display());
        }
        removed
    }

    pub async fn clear(&self) {
        self.tags.write().await.clear();
    }
}

fn tag_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}
