use super::*;

impl WorkspaceSession {
    /// Snapshot location, whether or not the index was built yet.
    pub fn snapshot_path(&self) -> PathBuf {
        self.config
            .snapshot_path
            .clone()
            .unwrap_or_else(|| self.config.root.join(crate::index::SNAPSHOT_RELATIVE_PATH))
    }

    pub async fn persist(&self) -> Result<()> {
        match self.index().await {
            Some(index) => index.persist().await,
            None => Ok(()),
        }
    }

    /// Delete the snapshot and reset the in-memory index.
    pub async fn clear_index(&self) -> Result<()> {
        match self.index().await {
            Some(index) => index.clear_snapshot().await?,
            None => self.view.remove(&self.snapshot_path()).await?,
        }
        tracing::info!("Cleared index at {}", self.snapshot_path().display());
        Ok(())
    }
}
