use crate::fs::{FileSystemProvider, now_millis};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tagscope_api::{
    AttributeInfo, ClassMember, ComponentMetadata, Decorator, Location, MemberKind,
    MetadataCompiler,
};

/// Framework import a module must carry to be considered a component.
const FRAMEWORK_IMPORTS: [&str; 2] = ["from \"lwc\"", "from 'lwc'"];

#[derive(Debug, Clone, Default)]
struct Attributes {
    public: Vec<AttributeInfo>,
    private: Vec<AttributeInfo>,
}

/// One indexed component.
///
/// The name is the stem of `file`. Attribute, method and description views are
/// derived from the metadata on first use and dropped whenever the metadata is
/// replaced.
#[derive(Debug, Clone)]
pub struct Tag {
    file: PathBuf,
    metadata: Option<ComponentMetadata>,
    updated_at: u64,
    attributes: OnceCell<Attributes>,
    methods: OnceCell<Vec<ClassMember>>,
    description: OnceCell<String>,
}

/// Persisted shape of a tag inside the snapshot file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TagRecord {
    pub file: PathBuf,
    pub metadata: Option<ComponentMetadata>,
    pub updated_at: u64,
}

async fn mtime_or_now(file: &Path, stat_source: Option<&dyn FileSystemProvider>) -> u64 {
    if let Some(fs) = stat_source {
        if let Some(stat) = fs.stat(file).await {
            return stat.mtime;
        }
    }
    now_millis()
}

impl Tag {
    /// An explicit `updated_at` wins, then the stat source's mtime, then now.
    pub async fn create(
        file: PathBuf,
        metadata: Option<ComponentMetadata>,
        updated_at: Option<u64>,
        stat_source: Option<&dyn FileSystemProvider>,
    ) -> Self {
        let updated_at = match updated_at {
            Some(ts) => ts,
            None => mtime_or_now(&file, stat_source).await,
        };
        Self::with_timestamp(file, metadata, updated_at)
    }

    pub fn with_timestamp(
        file: PathBuf,
        metadata: Option<ComponentMetadata>,
        updated_at: u64,
    ) -> Self {
        Self {
            file,
            metadata,
            updated_at,
            attributes: OnceCell::new(),
            methods: OnceCell::new(),
            description: OnceCell::new(),
        }
    }

    /// Compile `path` through `view` and build a tag from the result.
    ///
    /// Anything that keeps the file out of the index (empty path, unreadable
    /// content, no framework import, diagnostics, no metadata) yields `None`.
    pub async fn from_file(
        path: &Path,
        view: &dyn FileSystemProvider,
        compiler: Arc<dyn MetadataCompiler>,
        updated_at: Option<u64>,
    ) -> Option<Self> {
        if path.as_os_str().is_empty() {
            return None;
        }
        let Some(source) = view.content(path).await else {
            tracing::debug!("No content for {}", path.display());
            return None;
        };
        if !FRAMEWORK_IMPORTS.iter().any(|needle| source.contains(needle)) {
            tracing::trace!("{} does not import the framework", path.display());
            return None;
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let output = match tokio::task::spawn_blocking(move || {
            compiler.compile(&source, &file_name)
        })
        .await
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("Compiler task for {} failed: {}", path.display(), e);
                return None;
            }
        };

        if !output.diagnostics.is_empty() {
            tracing::debug!(
                "{} has {} diagnostics, skipping (first: {})",
                path.display(),
                output.diagnostics.len(),
                output.diagnostics[0].message
            );
            return None;
        }
        let metadata = output.into_metadata()?;
        Some(Self::create(path.to_path_buf(), Some(metadata), updated_at, Some(view)).await)
    }

    /// Replace the metadata and refresh the timestamp from `stat_source`
    /// (or now).
    pub async fn update_metadata(
        &mut self,
        metadata: ComponentMetadata,
        stat_source: Option<&dyn FileSystemProvider>,
    ) {
        self.metadata = Some(metadata);
        self.attributes = OnceCell::new();
        self.methods = OnceCell::new();
        self.description = OnceCell::new();
        self.updated_at = mtime_or_now(&self.file, stat_source).await;
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn metadata(&self) -> Option<&ComponentMetadata> {
        self.metadata.as_ref()
    }

    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    pub fn name(&self) -> &str {
        self.file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    pub fn uri(&self) -> String {
        file_uri(&self.file)
    }

    fn class_members(&self) -> &[ClassMember] {
        self.metadata
            .as_ref()
            .map(|m| m.class_members.as_slice())
            .unwrap_or_default()
    }

    fn all_attributes(&self) -> &Attributes {
        self.attributes.get_or_init(|| {
            let mut attrs = Attributes::default();
            for member in self.class_members() {
                if member.kind != MemberKind::Property {
                    continue;
                }
                let info = AttributeInfo {
                    name: member.name.clone(),
                    decorator: member.decorator,
                    documentation: member.doc.clone(),
                    location: member.loc.map(|range| Location::new(&self.file, range)),
                };
                if member.decorator == Some(Decorator::Api) {
                    attrs.public.push(info);
                } else {
                    attrs.private.push(info);
                }
            }
            attrs
        })
    }

    /// `@api` properties, in declaration order.
    pub fn public_attributes(&self) -> &[AttributeInfo] {
        &self.all_attributes().public
    }

    pub fn private_attributes(&self) -> &[AttributeInfo] {
        &self.all_attributes().private
    }

    pub fn methods(&self) -> &[ClassMember] {
        self.methods.get_or_init(|| {
            self.class_members()
                .iter()
                .filter(|m| m.kind == MemberKind::Method)
                .cloned()
                .collect()
        })
    }

    pub fn api_methods(&self) -> impl Iterator<Item = &ClassMember> {
        self.methods()
            .iter()
            .filter(|m| m.decorator == Some(Decorator::Api))
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.public_attributes().iter().find(|a| a.name == name)
    }

    pub fn class_member(&self, name: &str) -> Option<&ClassMember> {
        self.class_members().iter().find(|m| m.name == name)
    }

    pub fn class_member_location(&self, name: &str) -> Option<Location> {
        let range = self.class_member(name)?.loc?;
        Some(Location::new(&self.file, range))
    }

    /// Declaration of the component class, or the start of the file.
    pub fn location(&self) -> Location {
        let range = self
            .metadata
            .as_ref()
            .and_then(|m| m.declaration_loc)
            .unwrap_or_default();
        Location::new(&self.file, range)
    }

    /// The declaration first, then sibling `<name>.html` / `<name>.css` files
    /// in listing order.
    pub async fn locations(&self, view: &dyn FileSystemProvider) -> Vec<Location> {
        let mut locations = vec![self.location()];
        let Some(dir) = self.file.parent() else {
            return locations;
        };
        let name = self.name();
        for entry in view.directory_listing(dir).await {
            if !entry.is_file() {
                continue;
            }
            let sibling = Path::new(&entry.name);
            let stem_matches = sibling.file_stem().and_then(|s| s.to_str()) == Some(name);
            let ext = sibling.extension().and_then(|e| e.to_str());
            if stem_matches && matches!(ext, Some("html" | "css")) {
                locations.push(Location::file_start(&entry.path));
            }
        }
        locations
    }

    /// Markdown shown on hover: class doc, public attributes, public methods.
    pub fn description(&self) -> &str {
        self.description.get_or_init(|| {
            let mut sections = Vec::new();
            if let Some(doc) = self.metadata.as_ref().and_then(|m| m.doc.as_deref()) {
                if !doc.is_empty() {
                    sections.push(doc.to_string());
                }
            }

            let attributes = self.public_attributes();
            if !attributes.is_empty() {
                let mut lines = vec!["### Attributes".to_string()];
                lines.extend(attributes.iter().map(AttributeInfo::markdown));
                sections.push(lines.join("\n"));
            }

            let methods: Vec<_> = self.api_methods().collect();
            if !methods.is_empty() {
                let mut lines = vec!["### Methods".to_string()];
                lines.extend(methods.iter().map(|m| match &m.doc {
                    Some(doc) => format!("- **{}()** {}", m.name, doc),
                    None => format!("- **{}()**", m.name),
                }));
                sections.push(lines.join("\n"));
            }
            sections.join("\n")
        })
    }

    pub fn to_record(&self) -> TagRecord {
        TagRecord {
            file: self.file.clone(),
            metadata: self.metadata.clone(),
            updated_at: self.updated_at,
        }
    }

    pub fn from_record(record: TagRecord) -> Self {
        Self::with_timestamp(record.file, record.metadata, record.updated_at)
    }
}

/// `file://` URI for an absolute path.
pub fn file_uri(path: &Path) -> String {
    match url::Url::from_file_path(path) {
        Ok(url) => url.to_string(),
        Err(()) => format!("file://{}", path.display()),
    }
}
