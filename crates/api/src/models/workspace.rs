use serde::{Deserialize, Serialize};
use std::fmt;

/// Layout of the workspace, which decides where components live.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceType {
    /// Project described by an `sfdx-project.json` manifest.
    Sfdx,
    /// Monolithic checkout rooted at the directory holding `workspace-user.xml`.
    CoreAll,
    /// A single project inside such a checkout.
    CorePartial,
    /// Plain npm/lwc project.
    Standard,
    #[default]
    Unknown,
}

impl WorkspaceType {
    /// Name of the directory that holds component bundles for this layout.
    pub fn component_container(&self) -> &'static str {
        match self {
            Self::Sfdx => "lwc",
            _ => "modules",
        }
    }

    pub fn is_sfdx(&self) -> bool {
        matches!(self, Self::Sfdx)
    }
}

impl fmt::Display for WorkspaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sfdx => "SFDX",
            Self::CoreAll => "CORE_ALL",
            Self::CorePartial => "CORE_PARTIAL",
            Self::Standard => "STANDARD",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}
