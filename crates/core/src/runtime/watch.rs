use super::*;
use crate::fs::is_relevant_path;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;

const DEBOUNCE_INTERVAL: Duration = Duration::from_millis(300);

struct FsWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl FsWatcher {
    fn new(root: &Path) -> notify::Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;
        watcher.watch(root, RecursiveMode::Recursive)?;
        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    async fn next_event(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await? {
                Ok(event) => return Some(event),
                Err(e) => tracing::warn!("Watcher error: {}", e),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Created,
    Changed,
}

fn is_watched(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .map(|rel| {
            rel.ancestors()
                .filter(|a| !a.as_os_str().is_empty())
                .all(is_relevant_path)
        })
        .unwrap_or(false)
}

impl WorkspaceSession {
    /// Follow disk changes below the workspace root and route them to the
    /// `on_file_*` hooks. The task ends when the session is cancelled or
    /// dropped.
    pub fn watch(self: &Arc<Self>) -> Result<tokio::task::JoinHandle<()>> {
        let root = self.config.root.clone();
        let mut watcher = FsWatcher::new(&root)?;
        let session = Arc::downgrade(self);
        let cancel_token = self.cancel_token.clone();

        let handle = tokio::spawn(async move {
            tracing::info!("Started watching {}", root.display());
            let mut pending: HashMap<PathBuf, Change> = HashMap::new();

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    event = watcher.next_event() => {
                        let Some(event) = event else { break };
                        let change = match event.kind {
                            EventKind::Create(_) => Change::Created,
                            EventKind::Modify(_) | EventKind::Remove(_) => Change::Changed,
                            _ => continue,
                        };
                        for path in event.paths {
                            if is_watched(&root, &path) {
                                let entry = pending.entry(path).or_insert(change);
                                if change == Change::Created {
                                    *entry = Change::Created;
                                }
                            }
                        }
                    }
                    _ = tokio::time::sleep(DEBOUNCE_INTERVAL), if !pending.is_empty() => {
                        let Some(session) = session.upgrade() else { break };
                        let batch: Vec<_> = pending.drain().collect();
                        tracing::debug!("Applying {} file system changes", batch.len());
                        for (path, change) in batch {
                            session.apply_disk_change(&path, change).await;
                        }
                    }
                }
            }
            tracing::info!("File watcher task ended for {}", root.display());
        });
        Ok(handle)
    }

    async fn apply_disk_change(&self, path: &Path, change: Change) {
        // The final state on disk decides, not the last event kind
        if !self.view.ground().exists(path).await {
            self.on_file_deleted(path).await;
            return;
        }
        match change {
            Change::Created => self.on_file_created(path).await,
            Change::Changed => self.on_file_changed(path).await,
        }
    }
}
