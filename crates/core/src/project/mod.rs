//! Workspace layout detection and source roots.

use crate::error::{Result, TagscopeError};
use crate::fs::FileSystemProvider;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tagscope_api::WorkspaceType;

pub const SFDX_PROJECT_FILE: &str = "sfdx-project.json";
pub const CORE_WORKSPACE_FILE: &str = "workspace-user.xml";
pub const LWC_CONFIG_FILE: &str = "lwc.config.json";
pub const PACKAGE_JSON_FILE: &str = "package.json";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PackageDirectory {
    pub path: String,
    #[serde(default)]
    pub default: bool,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SfdxManifest {
    #[serde(default)]
    pub package_directories: Vec<PackageDirectory>,
}

pub async fn detect_workspace_type(root: &Path, view: &dyn FileSystemProvider) -> WorkspaceType {
    if view.exists(&root.join(SFDX_PROJECT_FILE)).await {
        return WorkspaceType::Sfdx;
    }
    if view.exists(&root.join(CORE_WORKSPACE_FILE)).await {
        return WorkspaceType::CoreAll;
    }
    if let Some(parent) = root.parent() {
        if view.exists(&parent.join(CORE_WORKSPACE_FILE)).await {
            return WorkspaceType::CorePartial;
        }
    }
    if view.exists(&root.join(LWC_CONFIG_FILE)).await
        || view.exists(&root.join(PACKAGE_JSON_FILE)).await
    {
        return WorkspaceType::Standard;
    }
    WorkspaceType::Unknown
}

pub async fn read_sfdx_manifest(root: &Path, view: &dyn FileSystemProvider) -> Result<SfdxManifest> {
    let path = root.join(SFDX_PROJECT_FILE);
    let content = view
        .content(&path)
        .await
        .ok_or_else(|| TagscopeError::Manifest(format!("{} not found", path.display())))?;
    Ok(serde_json::from_str(&content)?)
}

/// Directories discovery starts from. SFDX projects use their package
/// directories; every other layout uses the workspace root.
pub async fn source_roots(
    root: &Path,
    workspace_type: WorkspaceType,
    view: &dyn FileSystemProvider,
) -> Vec<PathBuf> {
    if !workspace_type.is_sfdx() {
        return vec![root.to_path_buf()];
    }
    match read_sfdx_manifest(root, view).await {
        Ok(manifest) if !manifest.package_directories.is_empty() => manifest
            .package_directories
            .iter()
            .map(|pkg| root.join(pkg.path.trim_end_matches('/')))
            .collect(),
        Ok(_) => {
            tracing::warn!("No packageDirectories in {}, scanning the whole workspace", SFDX_PROJECT_FILE);
            vec![root.to_path_buf()]
        }
        Err(e) => {
            tracing::warn!("{}, scanning the whole workspace", e);
            vec![root.to_path_buf()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    #[tokio::test]
    async fn detects_layouts() {
        let fs = MemoryFileSystem::new();
        assert_eq!(detect_workspace_type(Path::new("/a"), &fs).await, WorkspaceType::Unknown);

        fs.sync_document(Path::new("/a/package.json"), "{}");
        assert_eq!(detect_workspace_type(Path::new("/a"), &fs).await, WorkspaceType::Standard);

        fs.sync_document(Path::new("/core/workspace-user.xml"), "<x/>");
        assert_eq!(detect_workspace_type(Path::new("/core"), &fs).await, WorkspaceType::CoreAll);
        assert_eq!(
            detect_workspace_type(Path::new("/core/ui-force"), &fs).await,
            WorkspaceType::CorePartial
        );

        fs.sync_document(Path::new("/a/sfdx-project.json"), "{}");
        assert_eq!(detect_workspace_type(Path::new("/a"), &fs).await, WorkspaceType::Sfdx);
    }

    #[tokio::test]
    async fn sfdx_source_roots_come_from_package_directories() {
        let fs = MemoryFileSystem::new();
        fs.sync_document(
            Path::new("/ws/sfdx-project.json"),
            r#"{"packageDirectories":[{"path":"force-app","default":true},{"path":"utils/"}]}"#,
        );
        let roots = source_roots(Path::new("/ws"), WorkspaceType::Sfdx, &fs).await;
        assert_eq!(
            roots,
            vec![PathBuf::from("/ws/force-app"), PathBuf::from("/ws/utils")]
        );

        let roots = source_roots(Path::new("/ws"), WorkspaceType::Standard, &fs).await;
        assert_eq!(roots, vec![PathBuf::from("/ws")]);
    }

    #[tokio::test]
    async fn broken_manifest_falls_back_to_root() {
        let fs = MemoryFileSystem::new();
        fs.sync_document(Path::new("/ws/sfdx-project.json"), "{ not json");
        let roots = source_roots(Path::new("/ws"), WorkspaceType::Sfdx, &fs).await;
        assert_eq!(roots, vec![PathBuf::from("/ws")]);
    }
}
