use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    Directory,
}

/// Stat record kept by a file-system view. `mtime` is milliseconds since the
/// Unix epoch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub exists: bool,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub mtime: u64,
    pub size: u64,
}

impl FileStat {
    pub fn file(mtime: u64, size: u64) -> Self {
        Self {
            exists: true,
            kind: FileKind::File,
            mtime,
            size,
        }
    }

    pub fn directory(mtime: u64) -> Self {
        Self {
            exists: true,
            kind: FileKind::Directory,
            mtime,
            size: 0,
        }
    }

    pub fn is_file(&self) -> bool {
        self.exists && self.kind == FileKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.exists && self.kind == FileKind::Directory
    }
}

/// One child of a directory listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DirEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub path: PathBuf,
}

impl DirEntry {
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }
}
