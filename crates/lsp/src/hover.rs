use crate::LspServer;
use crate::util::{strip_module_namespace, tag_at};
use tagscope_core::Tag;
use tagscope_core::naming::lwc_tag_name;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

pub async fn hover(server: &LspServer, params: HoverParams) -> Result<Option<Hover>> {
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
        tracing::debug!("hover: no component for '{}'", word);
        return Ok(None);
    };

    Ok(Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value: hover_text(&tag),
        }),
        range: None,
    }))
}

pub(crate) fn hover_text(tag: &Tag) -> String {
    let mut text = format!("**{}**", lwc_tag_name(tag.name()));
    let description = tag.description();
    if !description.is_empty() {
        text.push_str("\n\n");
        text.push_str(description);
    }
    text.push_str(&format!("\n\n*`{}`*", tag.file().display()));
    text
}
