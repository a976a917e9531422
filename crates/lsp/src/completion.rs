use crate::LspServer;
use std::sync::Arc;
use tagscope_api::Language;
use tagscope_core::Tag;
use tagscope_core::naming::{aura_tag_name, lwc_tag_name, module_specifier};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

/// Offer every indexed component, spelled for the dialect of the document.
pub async fn completion(
    server: &LspServer,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let uri = params.text_document_position.text_document.uri;
    let Some(language) = server.documents.get(&uri).map(|d| d.language.clone()) else {
        return Ok(None);
    };
    let Some(session) = server.session().await else {
        return Ok(None);
    };

    let tags = session.all_tags().await;
    let items = completion_items(&tags, &language);
    if items.is_empty() {
        return Ok(None);
    }
    Ok(Some(CompletionResponse::Array(items)))
}

pub(crate) fn completion_items(tags: &[Arc<Tag>], language: &Language) -> Vec<CompletionItem> {
    let spell: fn(&str) -> String = if *language == Language::HTML {
        lwc_tag_name
    } else if *language == Language::AURA {
        aura_tag_name
    } else if language.is_script() {
        module_specifier
    } else {
        return Vec::new();
    };

    tags.iter()
        .map(|tag| {
            let description = tag.description();
            CompletionItem {
                label: spell(tag.name()),
                kind: Some(CompletionItemKind::MODULE),
                detail: Some(tag.file().display().to_string()),
                documentation: (!description.is_empty()).then(|| {
                    Documentation::MarkupContent(MarkupContent {
                        kind: MarkupKind::Markdown,
                        value: description.to_string(),
                    })
                }),
                ..Default::default()
            }
        })
        .collect()
}
