//! File-system views the index reads through.
//!
//! Every consumer goes through [`FileSystemProvider`]; the concrete provider
//! (real disk, in-memory buffers, or the reconciled [`DualView`]) is chosen when
//! the session is built.

mod disk;
mod dual;
mod memory;

pub use disk::DiskFileSystem;
pub use dual::DualView;
pub use memory::MemoryFileSystem;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tagscope_api::{DirEntry, FileStat};

#[async_trait]
pub trait FileSystemProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn content(&self, path: &Path) -> Option<String>;

    async fn stat(&self, path: &Path) -> Option<FileStat>;

    async fn directory_listing(&self, path: &Path) -> Vec<DirEntry>;

    /// Replace the whole content of `path`, creating it if needed.
    async fn update_content(&self, path: &Path, content: &str) -> Result<()>;

    /// Forget `path`. Removing a missing path is not an error.
    async fn remove(&self, path: &Path) -> Result<()>;

    async fn exists(&self, path: &Path) -> bool {
        self.stat(path).await.is_some_and(|s| s.exists)
    }

    /// Whether the provider mirrors the operating system, so that deletions
    /// are observed on it rather than applied to it.
    fn mirrors_os(&self) -> bool {
        false
    }
}

pub fn now_millis() -> u64 {
    system_time_millis(SystemTime::now())
}

pub fn system_time_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Directories never worth descending into while discovering components.
pub fn is_relevant_path(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if name.starts_with('.') {
            return false;
        }
        if name == "node_modules" || name == "target" || name == "__tests__" {
            return false;
        }
    }
    true
}
