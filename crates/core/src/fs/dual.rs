use super::{FileSystemProvider, MemoryFileSystem};
use crate::error::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::Path;
use std::sync::Arc;
use tagscope_api::{DirEntry, FileStat};

/// Reconciles a ground-truth view (the scanned workspace) with the live-edit
/// view (unsaved editor buffers).
///
/// Reads prefer the live view; listings merge both; deletions hit both.
#[derive(Clone)]
pub struct DualView {
    ground: Arc<dyn FileSystemProvider>,
    live: Arc<MemoryFileSystem>,
}

impl DualView {
    pub fn new(ground: Arc<dyn FileSystemProvider>, live: Arc<MemoryFileSystem>) -> Self {
        Self { ground, live }
    }

    pub fn ground(&self) -> &Arc<dyn FileSystemProvider> {
        &self.ground
    }

    pub fn live(&self) -> &Arc<MemoryFileSystem> {
        &self.live
    }

    /// Apply a reported deletion to both views. A ground view that mirrors
    /// the OS already observed it and is left alone.
    pub async fn apply_deletion(&self, path: &Path) -> Result<()> {
        self.live.remove_path(path);
        if self.ground.mirrors_os() {
            return Ok(());
        }
        self.ground.remove(path).await
    }
}

#[async_trait]
impl FileSystemProvider for DualView {
    fn name(&self) -> &'static str {
        "dual"
    }

    async fn content(&self, path: &Path) -> Option<String> {
        match self.live.content(path).await {
            Some(content) => Some(content),
            None => self.ground.content(path).await,
        }
    }

    async fn stat(&self, path: &Path) -> Option<FileStat> {
        match self.live.stat(path).await {
            Some(stat) if stat.exists => Some(stat),
            _ => self.ground.stat(path).await,
        }
    }

    async fn directory_listing(&self, path: &Path) -> Vec<DirEntry> {
        let mut merged: IndexMap<String, DirEntry> = IndexMap::new();
        for entry in self.live.directory_listing(path).await {
            merged.entry(entry.name.clone()).or_insert(entry);
        }
        for entry in self.ground.directory_listing(path).await {
            merged.entry(entry.name.clone()).or_insert(entry);
        }
        merged.into_values().collect()
    }

    async fn update_content(&self, path: &Path, content: &str) -> Result<()> {
        self.ground.update_content(path, content).await?;
        if self.live.content(path).await.is_some() {
            self.live.sync_document(path, content);
        }
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        self.live.remove_path(path);
        self.ground.remove(path).await
    }

    async fn exists(&self, path: &Path) -> bool {
        self.live.exists(path).await || self.ground.exists(path).await
    }
}
