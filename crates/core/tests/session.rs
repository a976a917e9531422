mod common;

use common::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tagscope_api::{MetadataCompiler, WorkspaceType};
use tagscope_core::fs::{FileSystemProvider, MemoryFileSystem};
use tagscope_core::index::TS_CONFIG_RELATIVE_PATH;
use tagscope_core::runtime::InitPhase;
use tagscope_core::{SessionConfig, SessionStatus, WorkspaceSession};

fn session_over(
    ground: MemoryFileSystem,
    compiler: &Arc<FakeCompiler>,
    config: SessionConfig,
) -> Arc<WorkspaceSession> {
    let ground: Arc<dyn FileSystemProvider> = Arc::new(ground);
    let compiler: Arc<dyn MetadataCompiler> = compiler.clone();
    WorkspaceSession::new(config, ground, compiler)
}

async fn wait_ready(session: &WorkspaceSession) -> usize {
    let mut status = session.subscribe_status();
    let status = status
        .wait_for(|s| matches!(s, SessionStatus::Ready { .. }))
        .await
        .unwrap()
        .clone();
    match status {
        SessionStatus::Ready { components } => components,
        _ => unreachable!(),
    }
}

#[tokio::test(start_paused = true)]
async fn burst_of_documents_initializes_once() {
    let compiler = Arc::new(FakeCompiler::default());
    let session = session_over(sfdx_workspace(0), &compiler, SessionConfig::new(ROOT));
    let _driver = session.start_delayed_initialization();

    for i in 0..5 {
        let path = component_path(&format!("burst{i}"));
        session.on_document_opened(&path, &component_source("")).await;
        tokio::time::advance(Duration::from_millis(200)).await;
    }
    assert_eq!(compiler.calls(), 0);
    assert!(matches!(session.phase(), InitPhase::Stabilizing { .. }));

    assert_eq!(wait_ready(&session).await, 5);
    assert_eq!(compiler.calls(), 5);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(compiler.calls(), 5);
    assert_eq!(session.phase(), InitPhase::Ready);
}

#[tokio::test(start_paused = true)]
async fn empty_result_waits_for_more_files() {
    let compiler = Arc::new(FakeCompiler::default());
    let session = session_over(sfdx_workspace(0), &compiler, SessionConfig::new(ROOT));
    let _driver = session.start_delayed_initialization();

    session
        .on_document_opened(&Path::new(ROOT).join("README.md"), "# hi")
        .await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(session.phase(), InitPhase::Accumulating);
    assert_eq!(session.status(), SessionStatus::Waiting);

    session
        .on_document_opened(&component_path("late"), &component_source(""))
        .await;
    assert_eq!(wait_ready(&session).await, 1);
    assert!(session.resolve_by_name("c-late").await.is_some());
}

#[tokio::test(start_paused = true)]
async fn declared_project_waits_for_its_manifest() {
    let compiler = Arc::new(FakeCompiler::default());
    let config = SessionConfig::new(ROOT).with_workspace_type(WorkspaceType::Sfdx);
    let session = session_over(MemoryFileSystem::new(), &compiler, config);
    let _driver = session.start_delayed_initialization();

    session
        .on_document_opened(&component_path("early"), &component_source(""))
        .await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(!session.is_ready());
    assert_eq!(compiler.calls(), 0);

    session
        .on_document_opened(&Path::new(ROOT).join("sfdx-project.json"), MANIFEST)
        .await;
    assert_eq!(wait_ready(&session).await, 1);
}

#[tokio::test]
async fn immediate_init_then_live_edits() {
    let compiler = Arc::new(FakeCompiler::default());
    let session = session_over(sfdx_workspace(2), &compiler, SessionConfig::new(ROOT));

    let stats = session.init().await.unwrap().unwrap();
    assert_eq!(stats.total, 2);
    assert!(session.is_ready());

    let path = component_path("cmp0");
    session
        .on_document_changed(&path, &component_source("@api title;"))
        .await;
    let tag = session.resolve_by_name("cmp0").await.unwrap();
    assert_eq!(tag.public_attributes()[0].name, "title");

    // Unsaved edits live in the live view only
    let ground = session.view().ground().content(&path).await.unwrap();
    assert!(!ground.contains("title"));

    session.on_document_closed(&path).await;
    let tag = session.resolve_by_name("cmp0").await.unwrap();
    assert!(tag.public_attributes().is_empty());

    session.on_file_deleted(&path).await;
    assert!(session.resolve_by_name("cmp0").await.is_none());
    assert_eq!(session.all_tags().await.len(), 1);
}

#[tokio::test]
async fn concurrent_init_requests_run_once() {
    let compiler = Arc::new(FakeCompiler::default());
    let session = session_over(sfdx_workspace(3), &compiler, SessionConfig::new(ROOT));

    let (a, b) = tokio::join!(session.init(), session.init());
    let ran: Vec<_> = [a.unwrap(), b.unwrap()].into_iter().flatten().collect();
    assert_eq!(ran.len(), 1);
    assert_eq!(compiler.calls(), 3);
}

#[tokio::test]
async fn clear_index_removes_snapshot() {
    let compiler = Arc::new(FakeCompiler::default());
    let session = session_over(sfdx_workspace(1), &compiler, SessionConfig::new(ROOT));
    session.init().await.unwrap();
    let snapshot = session.snapshot_path();
    assert!(session.view().exists(&snapshot).await);

    session.clear_index().await.unwrap();
    assert!(!session.view().exists(&snapshot).await);
    assert!(session.all_tags().await.is_empty());
}

fn attribute_names(tag: &tagscope_core::Tag) -> Vec<String> {
    tag.public_attributes()
        .iter()
        .map(|a| a.name.clone())
        .collect()
}

#[tokio::test]
async fn live_edit_during_init_wins() {
    let compiler = Arc::new(GatedCompiler::default());
    let dyn_compiler: Arc<dyn MetadataCompiler> = compiler.clone();
    let ground: Arc<dyn FileSystemProvider> = Arc::new(sfdx_workspace(1));
    let session = WorkspaceSession::new(SessionConfig::new(ROOT), ground, dyn_compiler);

    let init = tokio::spawn({
        let session = session.clone();
        async move { session.init().await }
    });
    compiler.entered.notified().await;

    let path = component_path("cmp0");
    session
        .on_document_changed(&path, &component_source("@api title;"))
        .await;
    compiler.release();
    init.await.unwrap().unwrap();

    assert!(session.is_ready());
    let tag = session.resolve_by_name("cmp0").await.unwrap();
    assert_eq!(attribute_names(&tag), vec!["title"]);
    let live_mtime = session.view().stat(&path).await.unwrap().mtime;
    assert_eq!(tag.updated_at(), live_mtime);
}

#[tokio::test]
async fn unwritable_snapshot_still_reaches_ready() {
    let compiler = Arc::new(FakeCompiler::default());
    let dyn_compiler: Arc<dyn MetadataCompiler> = compiler.clone();
    let ground: Arc<dyn FileSystemProvider> =
        Arc::new(ReadOnlyFileSystem(Arc::new(sfdx_workspace(2))));
    let session = WorkspaceSession::new(SessionConfig::new(ROOT), ground, dyn_compiler);

    let stats = session.init().await.unwrap().unwrap();
    assert_eq!(stats.total, 2);
    assert!(session.is_ready());
    assert_eq!(session.status(), SessionStatus::Ready { components: 2 });

    let path = component_path("cmp0");
    session
        .on_document_changed(&path, &component_source("@api title;"))
        .await;
    let tag = session.resolve_by_name("cmp0").await.unwrap();
    assert_eq!(attribute_names(&tag), vec!["title"]);

    let stats = session.reindex().await.unwrap();
    assert_eq!(stats.total, 2);
}

#[tokio::test]
async fn watched_module_events_keep_ts_config_in_sync() {
    let compiler = Arc::new(FakeCompiler::default());
    let dyn_compiler: Arc<dyn MetadataCompiler> = compiler.clone();
    let ground = Arc::new(sfdx_workspace(1));
    let ts_config = Path::new(ROOT).join(TS_CONFIG_RELATIVE_PATH);
    ground.sync_document(&ts_config, r#"{"compilerOptions":{}}"#);
    let view: Arc<dyn FileSystemProvider> = ground.clone();
    let session = WorkspaceSession::new(SessionConfig::new(ROOT), view, dyn_compiler);

    session.init().await.unwrap();
    assert_eq!(
        ts_config_paths(&ground, &ts_config).await,
        serde_json::json!({ "c/cmp0": [format!("{LWC_DIR}/cmp0/cmp0")] })
    );

    let fresh = add_component(&ground, "fresh", "");
    session.on_file_created(&fresh).await;
    assert!(session.resolve_by_name("fresh").await.is_some());
    let mapped = ts_config_paths(&ground, &ts_config).await;
    assert_eq!(
        mapped["c/fresh"],
        serde_json::json!([format!("{LWC_DIR}/fresh/fresh")])
    );

    session
        .on_file_deleted(&Path::new(LWC_DIR).join("fresh"))
        .await;
    assert!(session.resolve_by_name("fresh").await.is_none());
    let mapped = ts_config_paths(&ground, &ts_config).await;
    assert_eq!(mapped.as_object().unwrap().len(), 1);
    assert!(mapped.get("c/fresh").is_none());
}

async fn ts_config_paths(ground: &MemoryFileSystem, ts_config: &Path) -> serde_json::Value {
    let content = ground.content(ts_config).await.unwrap();
    let config: serde_json::Value = serde_json::from_str(&content).unwrap();
    config["compilerOptions"]["paths"].clone()
}
