use crate::models::{ComponentMetadata, Range};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub range: Option<Range>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, range: Option<Range>) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Result of one compilation. A usable result carries metadata and no
/// diagnostics; anything else means the file contributes nothing to the index.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    pub metadata: Option<ComponentMetadata>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn ok(metadata: ComponentMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            diagnostics: Vec::new(),
        }
    }

    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            metadata: None,
            diagnostics,
        }
    }

    pub fn into_metadata(self) -> Option<ComponentMetadata> {
        if self.diagnostics.is_empty() {
            self.metadata
        } else {
            None
        }
    }
}

/// Extracts component metadata from module source.
///
/// Implementations must be safe to call from many tasks at once and must not
/// panic on malformed input; report problems as diagnostics instead.
pub trait MetadataCompiler: Send + Sync {
    fn compile(&self, source: &str, file_name: &str) -> CompileOutput;
}
