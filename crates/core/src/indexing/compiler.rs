use super::DiscoveryEntry;
use crate::fs::FileSystemProvider;
use crate::model::Tag;
use futures::future::join_all;
use std::sync::Arc;
use tagscope_api::MetadataCompiler;

/// Compiles a batch of discovered modules concurrently.
pub struct BatchCompiler {
    view: Arc<dyn FileSystemProvider>,
    compiler: Arc<dyn MetadataCompiler>,
}

impl BatchCompiler {
    pub fn new(view: Arc<dyn FileSystemProvider>, compiler: Arc<dyn MetadataCompiler>) -> Self {
        Self { view, compiler }
    }

    /// One tag per entry that compiles cleanly, stamped with the entry's
    /// mtime so the next scan sees it as indexed.
    pub async fn compile_batch(&self, entries: &[&DiscoveryEntry]) -> Vec<Tag> {
        let tasks = entries.iter().map(|entry| {
            let view = self.view.clone();
            let compiler = self.compiler.clone();
            async move { Tag::from_file(&entry.path, view.as_ref(), compiler, Some(entry.mtime)).await }
        });
        let tags: Vec<Tag> = join_all(tasks).await.into_iter().flatten().collect();
        tracing::debug!("Compiled {} of {} modules", tags.len(), entries.len());
        tags
    }
}
