use crate::WorkspaceArgs;
use tracing::info;

pub async fn run(workspace: WorkspaceArgs, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let session = workspace.open_session();
    info!("Indexing components at: {}...", session.root().display());

    let mut stats = session
        .init()
        .await?
        .ok_or("an initialization is already running")?;
    if force {
        info!("Recompiling every component module");
        stats = session.reindex().await?;
    }

    info!(
        "Indexing complete: {} discovered, {} compiled, {} removed",
        stats.discovered, stats.compiled, stats.removed
    );
    println!("{} components", stats.total);
    for tag in session.all_tags().await.iter().take(10) {
        info!(" - {} ({})", tag.name(), tag.file().display());
    }
    Ok(())
}
