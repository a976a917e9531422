#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use tagscope_api::{
    ClassMember, CompileOutput, ComponentMetadata, Decorator, DirEntry, Diagnostic, FileStat,
    MemberKind, MetadataCompiler, Range,
};
use tagscope_core::fs::{FileSystemProvider, MemoryFileSystem};

pub const ROOT: &str = "/ws";
pub const LWC_DIR: &str = "/ws/force-app/main/default/lwc";
pub const MANIFEST: &str = r#"{"packageDirectories":[{"path":"force-app","default":true}]}"#;

/// Understands just enough of a module to be useful in tests: every
/// `@api <name>` line becomes a public property, `// doc: <text>` becomes the
/// class doc, and `SYNTAX_ERROR` yields a diagnostic.
#[derive(Default)]
pub struct FakeCompiler {
    calls: AtomicUsize,
}

impl FakeCompiler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataCompiler for FakeCompiler {
    fn compile(&self, source: &str, _file_name: &str) -> CompileOutput {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if source.contains("SYNTAX_ERROR") {
            return CompileOutput::failed(vec![Diagnostic::new("Unexpected token", None)]);
        }
        let mut metadata = ComponentMetadata {
            declaration_loc: Some(Range::new(1, 0, 1, 10)),
            ..Default::default()
        };
        for (line_no, line) in source.lines().enumerate() {
            let line = line.trim();
            if let Some(name) = line.strip_prefix("@api ") {
                metadata.class_members.push(ClassMember {
                    name: name.trim_end_matches(';').to_string(),
                    kind: MemberKind::Property,
                    decorator: Some(Decorator::Api),
                    doc: None,
                    loc: Some(Range::new(line_no, 0, line_no, line.len())),
                });
            } else if let Some(doc) = line.strip_prefix("// doc: ") {
                metadata.doc = Some(doc.to_string());
            }
        }
        CompileOutput::ok(metadata)
    }
}

/// Holds its first `compile` call until released, so a test can act while a
/// scan is in flight. Every call then behaves like [`FakeCompiler`].
#[derive(Default)]
pub struct GatedCompiler {
    pub entered: tokio::sync::Notify,
    gated: AtomicBool,
    gate: (Mutex<bool>, Condvar),
    inner: FakeCompiler,
}

impl GatedCompiler {
    pub fn release(&self) {
        let (lock, cvar) = &self.gate;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    pub fn calls(&self) -> usize {
        self.inner.calls()
    }
}

impl MetadataCompiler for GatedCompiler {
    fn compile(&self, source: &str, file_name: &str) -> CompileOutput {
        if !self.gated.swap(true, Ordering::SeqCst) {
            self.entered.notify_one();
            let (lock, cvar) = &self.gate;
            let mut open = lock.lock().unwrap();
            while !*open {
                open = cvar.wait(open).unwrap();
            }
        }
        self.inner.compile(source, file_name)
    }
}

/// Reads through to a memory view; every write fails.
pub struct ReadOnlyFileSystem(pub Arc<MemoryFileSystem>);

fn read_only(path: &Path) -> tagscope_core::TagscopeError {
    std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        format!("{} is read-only", path.display()),
    )
    .into()
}

#[async_trait::async_trait]
impl FileSystemProvider for ReadOnlyFileSystem {
    fn name(&self) -> &'static str {
        "read-only"
    }

    async fn content(&self, path: &Path) -> Option<String> {
        self.0.content(path).await
    }

    async fn stat(&self, path: &Path) -> Option<FileStat> {
        self.0.stat(path).await
    }

    async fn directory_listing(&self, path: &Path) -> Vec<DirEntry> {
        self.0.directory_listing(path).await
    }

    async fn update_content(&self, path: &Path, _content: &str) -> tagscope_core::Result<()> {
        Err(read_only(path))
    }

    async fn remove(&self, path: &Path) -> tagscope_core::Result<()> {
        Err(read_only(path))
    }
}

pub fn component_path(name: &str) -> PathBuf {
    Path::new(LWC_DIR).join(name).join(format!("{name}.js"))
}

pub fn component_source(body: &str) -> String {
    format!(
        "import {{ LightningElement, api }} from 'lwc';\nexport default class extends LightningElement {{\n{body}\n}}\n"
    )
}

/// SFDX workspace with `count` components named `cmp0..cmpN`.
pub fn sfdx_workspace(count: usize) -> MemoryFileSystem {
    let fs = MemoryFileSystem::new();
    fs.sync_document(&Path::new(ROOT).join("sfdx-project.json"), MANIFEST);
    for i in 0..count {
        add_component(&fs, &format!("cmp{i}"), "");
    }
    fs
}

pub fn add_component(fs: &MemoryFileSystem, name: &str, body: &str) -> PathBuf {
    let path = component_path(name);
    fs.sync_document(&path, &component_source(body));
    fs.sync_document(&path.with_extension("html"), "<template></template>");
    path
}
