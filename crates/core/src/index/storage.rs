use super::*;
use crate::model::TagRecord;

/// Snapshot location relative to the workspace root.
pub const SNAPSHOT_RELATIVE_PATH: &str = ".sfdx/indexes/lwc/custom-components.json";

impl ComponentIndex {
    /// Merge the snapshot into memory. Names already in memory are kept; a
    /// missing or unreadable snapshot leaves the index untouched.
    pub async fn load_from_snapshot(&self) -> usize {
        let path = &self.config.snapshot_path;
        let Some(content) = self.view.content(path).await else {
            tracing::debug!("No snapshot at {}", path.display());
            return 0;
        };
        let records: Vec<TagRecord> = match serde_json::from_str(&content) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse snapshot at {}: {}. Will rebuild.",
                    path.display(),
                    e
                );
                return 0;
            }
        };

        let mut tags = self.tags.write().await;
        let mut loaded = 0;
        for record in records {
            let tag = Tag::from_record(record);
            let name = tag.name().to_string();
            if name.is_empty() || tags.contains_key(&name) {
                continue;
            }
            tags.insert(name, Arc::new(tag));
            loaded += 1;
        }
        tracing::info!("Loaded {} components from {}", loaded, path.display());
        loaded
    }

    /// Rewrite the snapshot with every tag, sorted by name.
    pub async fn persist(&self) -> Result<()> {
        let records: Vec<TagRecord> = self
            .all_tags()
            .await
            .iter()
            .map(|tag| tag.to_record())
            .collect();
        let json = serde_json::to_string(&records)?;
        self.view
            .update_content(&self.config.snapshot_path, &json)
            .await?;
        tracing::info!(
            "Saved {} components to {}",
            records.len(),
            self.config.snapshot_path.display()
        );
        Ok(())
    }

    /// Persist, logging a failed write instead of returning it. The
    /// in-memory index stays authoritative. Returns whether the write landed.
    pub async fn persist_or_warn(&self) -> bool {
        match self.persist().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Failed to save snapshot to {}: {}",
                    self.config.snapshot_path.display(),
                    e
                );
                false
            }
        }
    }

    /// Delete the snapshot and forget every tag.
    pub async fn clear_snapshot(&self) -> Result<()> {
        self.view.remove(&self.config.snapshot_path).await?;
        self.clear().await;
        Ok(())
    }
}
