//! Workspace session: owns the file-system views, the component index and
//! the delayed-initialization driver.

use crate::error::{Result, TagscopeError};
use crate::fs::{DiskFileSystem, DualView, FileSystemProvider, MemoryFileSystem};
use crate::index::{ComponentIndex, IndexConfig, IndexStats};
use crate::indexing::is_component_module;
use crate::model::Tag;
use crate::project;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tagscope_api::{MetadataCompiler, WorkspaceType};
use tokio::sync::watch::{Receiver, Sender};
use tokio::sync::{Notify, RwLock};
use tokio_util::sync::CancellationToken;

mod lifecycle;
pub mod scheduler;
mod storage;
mod watch;

pub use scheduler::{InitOutcome, InitPhase, InitScheduler, SchedulerOptions};

/// Explicit configuration of a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub root: PathBuf,
    /// Declared layout. Detected from the workspace when absent.
    pub workspace_type: Option<WorkspaceType>,
    /// Snapshot location. Defaults to the standard path under `root`.
    pub snapshot_path: Option<PathBuf>,
    pub scheduler: SchedulerOptions,
}

impl SessionConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            workspace_type: None,
            snapshot_path: None,
            scheduler: SchedulerOptions::default(),
        }
    }

    pub fn with_workspace_type(mut self, workspace_type: WorkspaceType) -> Self {
        self.workspace_type = Some(workspace_type);
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn with_scheduler_options(mut self, options: SchedulerOptions) -> Self {
        self.scheduler = options;
        self
    }

    pub fn with_quiescence(mut self, quiescence: std::time::Duration) -> Self {
        self.scheduler.quiescence = quiescence;
        self
    }

    pub fn with_max_wait(mut self, max_wait: std::time::Duration) -> Self {
        self.scheduler.max_wait = max_wait;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Waiting,
    Indexing,
    Ready { components: usize },
    Failed(String),
}

pub struct WorkspaceSession {
    config: SessionConfig,
    view: Arc<DualView>,
    compiler: Arc<dyn MetadataCompiler>,

    /// Built on the first initialization attempt.
    index: RwLock<Option<Arc<ComponentIndex>>>,

    scheduler: Mutex<InitScheduler>,
    initializing: AtomicBool,
    /// Files reported by watched-file creations, on top of the live view.
    created_files: AtomicUsize,
    wake: Arc<Notify>,

    status: Sender<SessionStatus>,
    cancel_token: CancellationToken,
}

impl WorkspaceSession {
    pub fn new(
        config: SessionConfig,
        ground: Arc<dyn FileSystemProvider>,
        compiler: Arc<dyn MetadataCompiler>,
    ) -> Arc<Self> {
        let live = Arc::new(MemoryFileSystem::new());
        let (status, _) = tokio::sync::watch::channel(SessionStatus::Waiting);
        let scheduler = InitScheduler::new(config.scheduler);
        Arc::new(Self {
            config,
            view: Arc::new(DualView::new(ground, live)),
            compiler,
            index: RwLock::new(None),
            scheduler: Mutex::new(scheduler),
            initializing: AtomicBool::new(false),
            created_files: AtomicUsize::new(0),
            wake: Arc::new(Notify::new()),
            status,
            cancel_token: CancellationToken::new(),
        })
    }

    /// Session over the real file system rooted at `config.root`.
    pub fn on_disk(config: SessionConfig, compiler: Arc<dyn MetadataCompiler>) -> Arc<Self> {
        let root = config
            .root
            .canonicalize()
            .unwrap_or_else(|_| config.root.clone());
        let config = SessionConfig { root, ..config };
        Self::new(config, Arc::new(DiskFileSystem::new()), compiler)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    pub fn view(&self) -> &Arc<DualView> {
        &self.view
    }

    pub fn live(&self) -> &Arc<MemoryFileSystem> {
        self.view.live()
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> Receiver<SessionStatus> {
        self.status.subscribe()
    }

    pub fn phase(&self) -> InitPhase {
        self.scheduler().phase()
    }

    pub fn is_ready(&self) -> bool {
        self.scheduler().is_ready()
    }

    fn scheduler(&self) -> MutexGuard<'_, InitScheduler> {
        self.scheduler.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_status(&self, status: SessionStatus) {
        self.status.send_replace(status);
    }

    pub async fn index(&self) -> Option<Arc<ComponentIndex>> {
        self.index.read().await.clone()
    }

    async fn ready_index(&self) -> Option<Arc<ComponentIndex>> {
        if !self.is_ready() {
            return None;
        }
        self.index().await
    }

    async fn workspace_type(&self) -> WorkspaceType {
        match self.config.workspace_type {
            Some(declared) => declared,
            None => project::detect_workspace_type(&self.config.root, &*self.view).await,
        }
    }

    async fn ensure_index(&self) -> Arc<ComponentIndex> {
        if let Some(index) = self.index().await {
            return index;
        }
        let workspace_type = self.workspace_type().await;
        let mut slot = self.index.write().await;
        if let Some(index) = slot.as_ref() {
            return index.clone();
        }
        tracing::info!(
            "Workspace {} detected as {}",
            self.config.root.display(),
            workspace_type
        );
        let mut config = IndexConfig::new(&self.config.root, workspace_type);
        if let Some(path) = &self.config.snapshot_path {
            config = config.with_snapshot_path(path);
        }
        let view: Arc<dyn FileSystemProvider> = self.view.clone();
        let index = Arc::new(ComponentIndex::new(config, view, self.compiler.clone()));
        *slot = Some(index.clone());
        index
    }

    // ---- Queries ----

    pub async fn resolve_by_name(&self, query: &str) -> Option<Arc<Tag>> {
        self.index().await?.find_by_name(query).await
    }

    pub async fn resolve_by_uri(&self, uri: &str) -> Option<Arc<Tag>> {
        self.index().await?.find_by_uri(uri).await
    }

    /// Component owning `path`: its module, or the module next to its markup.
    pub async fn resolve_by_path(&self, path: &Path) -> Option<Arc<Tag>> {
        self.index().await?.find_by_path(path).await
    }

    pub async fn all_tags(&self) -> Vec<Arc<Tag>> {
        match self.index().await {
            Some(index) => index.all_tags().await,
            None => Vec::new(),
        }
    }

    /// Rebuild the index from every discovered module and persist it.
    pub async fn reindex(&self) -> Result<IndexStats> {
        let Some(index) = self.index().await else {
            return Err(TagscopeError::Internal(
                "reindex requested before initialization".to_string(),
            ));
        };
        let stats = index.reindex().await?;
        index.persist_or_warn().await;
        self.set_status(SessionStatus::Ready {
            components: stats.total,
        });
        Ok(stats)
    }

    // ---- Watched files (ground view) ----

    pub async fn on_file_created(&self, path: &Path) {
        if !self.is_ready() {
            self.created_files.fetch_add(1, Ordering::Relaxed);
            self.note_arrival();
        }
        self.reindex_path(path).await;
        self.sync_ts_config(path, true).await;
    }

    pub async fn on_file_changed(&self, path: &Path) {
        self.reindex_path(path).await;
    }

    pub async fn on_file_deleted(&self, path: &Path) {
        if let Err(e) = self.view.apply_deletion(path).await {
            tracing::warn!("Failed to apply deletion of {}: {}", path.display(), e);
        }
        if let Some(index) = self.index().await {
            index.remove_file(path).await;
        }
        self.sync_ts_config(path, false).await;
    }

    // ---- Live view ----

    pub async fn on_document_opened(&self, path: &Path, content: &str) {
        self.live().sync_document(path, content);
        if !self.is_ready() {
            self.note_arrival();
        }
        self.reindex_path(path).await;
    }

    pub async fn on_document_changed(&self, path: &Path, content: &str) {
        self.live().sync_document(path, content);
        if !self.is_ready() {
            self.note_arrival();
        }
        self.reindex_path(path).await;
    }

    pub async fn on_document_saved(&self, path: &Path) {
        self.reindex_path(path).await;
    }

    /// The buffer goes away; the ground view is authoritative again.
    pub async fn on_document_closed(&self, path: &Path) {
        self.live().remove_path(path);
        self.reindex_path(path).await;
    }

    /// Edits go to the index as soon as one exists, including while it is
    /// being initialized, so the scan's merge leaves them alone.
    async fn reindex_path(&self, path: &Path) {
        if !is_component_module(path) {
            return;
        }
        if let Some(index) = self.index().await {
            index.update_file(path).await;
        }
    }

    /// Keep `.sfdx/tsconfig.sfdx.json` path mappings in step with created and
    /// deleted modules. A created module is appended; a deletion anywhere under
    /// a component container rebuilds the whole mapping.
    async fn sync_ts_config(&self, path: &Path, created: bool) {
        let Some(index) = self.index().await else {
            return;
        };
        let workspace_type = index.config().workspace_type;
        if !workspace_type.is_sfdx() {
            return;
        }
        let container = workspace_type.component_container();
        let result = if created && is_component_module(path) {
            index.insert_ts_config_paths(&[path.to_path_buf()]).await
        } else if path.iter().any(|part| part == container) {
            index.update_ts_config_paths().await
        } else {
            return;
        };
        if let Err(e) = result {
            tracing::warn!("Error updating tsconfig path mapping: {}", e);
        }
    }

    fn known_file_count(&self) -> usize {
        self.live().known_file_count() + self.created_files.load(Ordering::Relaxed)
    }

    fn note_arrival(&self) {
        let count = self.known_file_count();
        let rearmed = self
            .scheduler()
            .record_arrival(tokio::time::Instant::now(), count);
        if rearmed {
            self.wake.notify_one();
        }
    }
}
