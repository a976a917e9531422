use super::{FileSystemProvider, system_time_millis};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use tagscope_api::{DirEntry, FileKind, FileStat};

/// Ground-truth view backed by the real file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFileSystem;

impl DiskFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystemProvider for DiskFileSystem {
    fn name(&self) -> &'static str {
        "disk"
    }

    fn mirrors_os(&self) -> bool {
        true
    }

    async fn content(&self, path: &Path) -> Option<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::debug!("Cannot read {}: {}", path.display(), e);
                None
            }
        }
    }

    async fn stat(&self, path: &Path) -> Option<FileStat> {
        let meta = tokio::fs::metadata(path).await.ok()?;
        let mtime = meta.modified().map(system_time_millis).unwrap_or(0);
        Some(if meta.is_dir() {
            FileStat::directory(mtime)
        } else {
            FileStat::file(mtime, meta.len())
        })
    }

    async fn directory_listing(&self, path: &Path) -> Vec<DirEntry> {
        let mut entries = Vec::new();
        let Ok(mut dir) = tokio::fs::read_dir(path).await else {
            return entries;
        };
        while let Ok(Some(entry)) = dir.next_entry().await {
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };
            if file_type.is_symlink() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let kind = if file_type.is_dir() {
                FileKind::Directory
            } else {
                FileKind::File
            };
            entries.push(DirEntry {
                name,
                kind,
                path: entry.path(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    async fn update_content(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Write to a sibling temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, path).await?;
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<()> {
        let result = match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(path).await,
            Ok(_) => tokio::fs::remove_file(path).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
