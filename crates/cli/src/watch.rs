use crate::WorkspaceArgs;
use tracing::info;

pub async fn run(workspace: WorkspaceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = workspace.open_session();

    info!("Initializing: indexing components at: {}...", session.root().display());
    if let Some(stats) = session.init().await? {
        info!("Initial indexing complete: {} components", stats.total);
    }

    let watcher = session.watch()?;
    info!("File watcher started. Ready for changes.");
    info!("Press Ctrl+C to stop.");

    tokio::signal::ctrl_c().await?;
    session.shutdown().await?;
    let _ = watcher.await;
    info!("Watcher stopped.");

    Ok(())
}
