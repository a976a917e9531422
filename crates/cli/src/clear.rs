use crate::WorkspaceArgs;
use tracing::info;

pub async fn run(workspace: WorkspaceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = workspace.open_session();
    info!("Clearing index at: {}...", session.snapshot_path().display());
    session.clear_index().await?;
    info!("Index cleared.");
    Ok(())
}
