use super::*;
use crate::project::SFDX_PROJECT_FILE;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep, sleep_until};

impl WorkspaceSession {
    /// Build the index right away, bypassing the quiescence wait.
    ///
    /// Returns `Ok(None)` when another initialization is already running.
    pub async fn init(&self) -> Result<Option<IndexStats>> {
        if self.initializing.swap(true, Ordering::AcqRel) {
            tracing::debug!("Initialization already in progress, request ignored");
            return Ok(None);
        }
        let result = self.run_initialization().await;
        self.initializing.store(false, Ordering::Release);

        match &result {
            Ok(stats) => {
                self.scheduler().force_ready();
                self.set_status(SessionStatus::Ready {
                    components: stats.total,
                });
            }
            Err(e) => self.set_status(SessionStatus::Failed(e.to_string())),
        }
        result.map(Some)
    }

    /// Start the delayed-initialization driver. The index is built once the
    /// number of known files stops changing for the quiescence window.
    pub fn start_delayed_initialization(self: &Arc<Self>) -> JoinHandle<()> {
        self.scheduler().start();
        if self.known_file_count() > 0 {
            self.note_arrival();
        }

        let session = Arc::downgrade(self);
        let wake = self.wake.clone();
        let cancel_token = self.cancel_token.clone();

        tokio::spawn(async move {
            loop {
                let deadline = match session.upgrade() {
                    Some(s) => s.scheduler().next_deadline(),
                    None => break,
                };
                let timer = async {
                    match deadline {
                        Some(deadline) => sleep_until(deadline).await,
                        None => std::future::pending::<()>().await,
                    }
                };

                tokio::select! {
                    _ = cancel_token.cancelled() => break,
                    _ = wake.notified() => continue,
                    _ = timer => {
                        let Some(session) = session.upgrade() else {
                            break;
                        };
                        session.run_scheduled_initialization().await;
                    }
                }
            }
            tracing::debug!("Delayed initialization driver stopped");
        })
    }

    async fn run_scheduled_initialization(&self) {
        if !self.scheduler().poll(Instant::now()) {
            return;
        }
        if self.initializing.swap(true, Ordering::AcqRel) {
            tracing::debug!("Scheduled initialization skipped: one is already running");
            let outcome = InitOutcome::Failed("busy".to_string());
            self.scheduler().complete(Instant::now(), &outcome);
            return;
        }

        tracing::info!(
            "Workspace quiet with {} known files, initializing",
            self.known_file_count()
        );
        let outcome = match self.run_initialization().await {
            Ok(stats) => InitOutcome::Indexed(stats.total),
            Err(TagscopeError::Manifest(msg)) => {
                tracing::warn!("{}", msg);
                InitOutcome::ManifestMissing
            }
            Err(e) => {
                tracing::error!("Initialization failed: {}", e);
                InitOutcome::Failed(e.to_string())
            }
        };
        self.initializing.store(false, Ordering::Release);

        let phase = self.scheduler().complete(Instant::now(), &outcome);
        match (&outcome, phase) {
            (InitOutcome::Indexed(total), InitPhase::Ready) => {
                self.set_status(SessionStatus::Ready { components: *total });
            }
            (InitOutcome::Failed(msg), _) => {
                self.set_status(SessionStatus::Failed(msg.clone()));
            }
            _ => {
                tracing::info!("No components indexed yet, waiting for more files");
                self.set_status(SessionStatus::Waiting);
            }
        }
        if phase != InitPhase::Ready {
            self.wake.notify_one();
        }
    }

    async fn run_initialization(&self) -> Result<IndexStats> {
        self.set_status(SessionStatus::Indexing);
        self.wait_for_manifest().await?;

        let index = self.ensure_index().await;
        let stats = index.init().await?;
        if stats.total == 0 {
            // Detection runs again on the next attempt
            *self.index.write().await = None;
        } else if index.config().workspace_type.is_sfdx()
            && let Err(e) = index.update_ts_config_paths().await
        {
            tracing::warn!("Error updating tsconfig path mapping: {}", e);
        }
        Ok(stats)
    }

    /// A declared SFDX project must expose its manifest before anything is
    /// scanned. Polls a bounded number of times.
    async fn wait_for_manifest(&self) -> Result<()> {
        if self.config.workspace_type != Some(WorkspaceType::Sfdx) {
            return Ok(());
        }
        let manifest = self.config.root.join(SFDX_PROJECT_FILE);
        let options = *self.scheduler().options();
        for attempt in 0..options.manifest_poll_attempts.max(1) {
            if self.view.exists(&manifest).await {
                return Ok(());
            }
            if attempt + 1 < options.manifest_poll_attempts {
                sleep(options.manifest_poll_interval).await;
            }
        }
        Err(TagscopeError::Manifest(format!(
            "{} not visible after {} checks",
            manifest.display(),
            options.manifest_poll_attempts
        )))
    }

    /// Stop background tasks and persist the index.
    pub async fn shutdown(&self) -> Result<()> {
        self.cancel_token.cancel();
        if let Some(index) = self.ready_index().await {
            index.persist().await?;
        }
        Ok(())
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }
}
