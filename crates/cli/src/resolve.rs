use crate::WorkspaceArgs;
use std::path::Path;
use tagscope_api::ApiError;

pub async fn run(
    workspace: WorkspaceArgs,
    query: String,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = workspace.open_session();
    session.init().await?;

    // A file path names the component that owns it
    let candidate = Path::new(&query);
    let tag = if candidate.is_file() {
        let path = candidate.canonicalize()?;
        session.resolve_by_path(&path).await
    } else {
        session.resolve_by_name(&query).await
    };
    let Some(tag) = tag else {
        return Err(ApiError::NotFound(format!("no component matches '{}'", query)).into());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tag.to_record())?);
    } else {
        println!("{}", tag.file().display());
    }
    Ok(())
}
