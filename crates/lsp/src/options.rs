use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tagscope_api::WorkspaceType;
use tagscope_core::SessionConfig;

/// `initializationOptions` sent by the client.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializationOptions {
    pub workspace_type: Option<WorkspaceType>,
    /// Wait for the workspace to settle before indexing.
    pub delayed_initialization: bool,
    pub quiescence_ms: Option<u64>,
    pub max_wait_ms: Option<u64>,
}

impl InitializationOptions {
    pub fn from_value(value: Option<serde_json::Value>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };
        match serde_json::from_value(value) {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!("Ignoring malformed initializationOptions: {}", e);
                Self::default()
            }
        }
    }

    pub fn session_config(&self, root: PathBuf) -> SessionConfig {
        let mut config = SessionConfig::new(root);
        if let Some(workspace_type) = self.workspace_type {
            config = config.with_workspace_type(workspace_type);
        }
        if let Some(ms) = self.quiescence_ms {
            config = config.with_quiescence(Duration::from_millis(ms));
        }
        if let Some(ms) = self.max_wait_ms {
            config = config.with_max_wait(Duration::from_millis(ms));
        }
        config
    }
}
