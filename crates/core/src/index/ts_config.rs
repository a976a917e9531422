use super::*;
use crate::error::TagscopeError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Generated TypeScript config relative to the workspace root. Only kept in
/// sync when it already exists.
pub const TS_CONFIG_RELATIVE_PATH: &str = ".sfdx/tsconfig.sfdx.json";

/// `compilerOptions.paths`: `c/<name>` to module paths without extension.
pub type TsConfigPaths = BTreeMap<String, Vec<String>>;

fn path_mapping(path: &Path) -> Option<(String, String)> {
    let name = path.file_stem()?.to_str()?;
    let target = path.with_extension("");
    Some((
        naming::module_specifier(name),
        target.to_string_lossy().into_owned(),
    ))
}

fn push_unique(paths: &mut TsConfigPaths, specifier: String, target: String) {
    let targets = paths.entry(specifier).or_default();
    if !targets.contains(&target) {
        targets.push(target);
    }
}

impl ComponentIndex {
    pub fn ts_config_path(&self) -> PathBuf {
        self.config.root.join(TS_CONFIG_RELATIVE_PATH)
    }

    /// Path mapping for every discovered module. Empty outside SFDX projects.
    pub async fn ts_config_path_mapping(&self) -> TsConfigPaths {
        let mut paths = TsConfigPaths::new();
        if !self.config.workspace_type.is_sfdx() {
            return paths;
        }
        for entry in self.discover().await {
            if let Some((specifier, target)) = path_mapping(&entry.path) {
                push_unique(&mut paths, specifier, target);
            }
        }
        paths
    }

    /// Replace `compilerOptions.paths` with a fresh mapping. Returns false
    /// when there is no config to update.
    pub async fn update_ts_config_paths(&self) -> Result<bool> {
        let mapping = self.ts_config_path_mapping().await;
        self.edit_ts_config(|paths| *paths = mapping).await
    }

    /// Add mappings for newly created modules, keeping existing entries.
    pub async fn insert_ts_config_paths(&self, modules: &[PathBuf]) -> Result<bool> {
        self.edit_ts_config(|paths| {
            for module in modules {
                if let Some((specifier, target)) = path_mapping(module) {
                    push_unique(paths, specifier, target);
                }
            }
        })
        .await
    }

    async fn edit_ts_config(&self, edit: impl FnOnce(&mut TsConfigPaths)) -> Result<bool> {
        let path = self.ts_config_path();
        let Some(content) = self.view.content(&path).await else {
            return Ok(false);
        };
        let mut config: Value = serde_json::from_str(&content)?;
        let Some(root) = config.as_object_mut() else {
            return Err(TagscopeError::Internal(format!(
                "{} is not a JSON object",
                path.display()
            )));
        };

        let options = root
            .entry("compilerOptions")
            .or_insert_with(|| Value::Object(Map::new()));
        if !options.is_object() {
            *options = Value::Object(Map::new());
        }
        let mut paths: TsConfigPaths = options
            .get("paths")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();
        edit(&mut paths);
        options["paths"] = serde_json::to_value(&paths)?;

        self.view
            .update_content(&path, &serde_json::to_string(&config)?)
            .await?;
        tracing::debug!("Updated {} path mappings in {}", paths.len(), path.display());
        Ok(true)
    }
}
