use crate::LspServer;
use crate::util::{strip_module_namespace, tag_at, to_lsp_location};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

/// Jump from a tag reference to the component class and its markup/style
/// siblings.
pub async fn definition(
    server: &LspServer,
    params: GotoDefinitionParams,
) -> Result<Option<GotoDefinitionResponse>> {
    let uri = params.text_document_position_params.text_document.uri;
    let position = params.text_document_position_params.position;

    let Some(word) = server
        .documents
        .get(&uri)
        .and_then(|doc| tag_at(&doc.content, position))
    else {
        return Ok(None);
    };
    let Some(session) = server.session().await else {
        return Ok(None);
    };
    let Some(tag) = session.resolve_by_name(strip_module_namespace(&word)).await else {
        return Ok(None);
    };

    let locations: Vec<Location> = tag
        .locations(&**session.view())
        .await
        .iter()
        .filter_map(to_lsp_location)
        .collect();
    if locations.is_empty() {
        return Ok(None);
    }
    Ok(Some(GotoDefinitionResponse::Array(locations)))
}
