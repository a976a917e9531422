use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// Document language as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(Cow<'static, str>);

impl Language {
    pub const JAVASCRIPT: Language = Language(Cow::Borrowed("javascript"));
    pub const TYPESCRIPT: Language = Language(Cow::Borrowed("typescript"));
    pub const HTML: Language = Language(Cow::Borrowed("html"));
    pub const CSS: Language = Language(Cow::Borrowed("css"));
    pub const AURA: Language = Language(Cow::Borrowed("aura"));
    pub const UNKNOWN: Language = Language(Cow::Borrowed("unknown"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Map a file extension to a Language.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" => Self::JAVASCRIPT,
            "ts" => Self::TYPESCRIPT,
            "html" => Self::HTML,
            "css" => Self::CSS,
            "cmp" | "app" | "evt" | "intf" | "design" | "auradoc" | "tokens" => Self::AURA,
            _ => Self::UNKNOWN,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::UNKNOWN)
    }

    /// Markup dialects that reference components by tag name.
    pub fn is_markup(&self) -> bool {
        *self == Self::HTML || *self == Self::AURA
    }

    /// Languages a component's primary module can be written in.
    pub fn is_script(&self) -> bool {
        *self == Self::JAVASCRIPT || *self == Self::TYPESCRIPT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
