use std::fs;
use std::path::Path;
use tagscope_cli::WorkspaceArgs;
use tempfile::tempdir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sfdx_workspace(root: &Path) {
    write(
        &root.join("sfdx-project.json"),
        r#"{ "packageDirectories": [{ "path": "force-app", "default": true }] }"#,
    );
    let lwc = root.join("force-app/main/default/lwc");
    write(
        &lwc.join("todoItem/todoItem.js"),
        r#"import { LightningElement, api } from 'lwc';

/** One entry of the list. */
export default class TodoItem extends LightningElement {
    /** Text of the entry. */
    @api label;
    @api done = false;
}
"#,
    );
    write(&lwc.join("todoItem/todoItem.html"), "<template>{label}</template>");
    write(
        &lwc.join("todo_list/todo_list.js"),
        r#"import { LightningElement } from 'lwc';
export default class TodoList extends LightningElement {}
"#,
    );
    write(&lwc.join("utils/helpers.js"), "export const noop = () => {};");
}

fn args(root: &Path) -> WorkspaceArgs {
    WorkspaceArgs {
        path: root.to_path_buf(),
        workspace_type: None,
        snapshot: None,
    }
}

#[tokio::test]
async fn indexes_and_resolves_an_sfdx_workspace_on_disk() {
    let dir = tempdir().unwrap();
    sfdx_workspace(dir.path());

    let session = args(dir.path()).open_session();
    let stats = session.init().await.unwrap().unwrap();
    assert_eq!(stats.total, 2);
    assert!(session.snapshot_path().exists());

    let item = session.resolve_by_name("c:todoItem").await.unwrap();
    assert_eq!(item.name(), "todoItem");
    assert_eq!(item.public_attributes().len(), 2);
    assert!(item.description().starts_with("One entry of the list."));

    let list = session.resolve_by_name("c-todo_list").await.unwrap();
    assert_eq!(list.name(), "todo_list");
    assert!(session.resolve_by_name("c-todoList").await.is_none());

    let locations = item.locations(&**session.view()).await;
    assert_eq!(locations.len(), 2);

    let markup = dir
        .path()
        .canonicalize()
        .unwrap()
        .join("force-app/main/default/lwc/todoItem/todoItem.html");
    let owner = session.resolve_by_path(&markup).await.unwrap();
    assert_eq!(owner.name(), "todoItem");
}

#[tokio::test]
async fn restart_reuses_the_snapshot_and_clear_removes_it() {
    let dir = tempdir().unwrap();
    sfdx_workspace(dir.path());

    let first = args(dir.path()).open_session();
    first.init().await.unwrap();

    let second = args(dir.path()).open_session();
    let stats = second.init().await.unwrap().unwrap();
    assert_eq!(stats.compiled, 0);
    assert_eq!(stats.total, 2);

    second.clear_index().await.unwrap();
    assert!(!second.snapshot_path().exists());
}
