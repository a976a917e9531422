use tower_lsp::lsp_types::*;

pub const REINDEX_COMMAND: &str = "tagscope.reindex";
pub const CLEAR_INDEX_COMMAND: &str = "tagscope.clearIndex";

pub fn server_capabilities() -> ServerCapabilities {
    ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Options(
            TextDocumentSyncOptions {
                open_close: Some(true),
                change: Some(TextDocumentSyncKind::INCREMENTAL),
                save: Some(TextDocumentSyncSaveOptions::Supported(true)),
                ..Default::default()
            },
        )),
        hover_provider: Some(HoverProviderCapability::Simple(true)),
        definition_provider: Some(OneOf::Left(true)),
        completion_provider: Some(CompletionOptions {
            trigger_characters: Some(vec![
                "<".to_string(),
                "-".to_string(),
                ":".to_string(),
                "/".to_string(),
            ]),
            ..Default::default()
        }),
        execute_command_provider: Some(ExecuteCommandOptions {
            commands: vec![REINDEX_COMMAND.to_string(), CLEAR_INDEX_COMMAND.to_string()],
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Watchers registered with the client once it is initialized.
pub fn file_watchers() -> DidChangeWatchedFilesRegistrationOptions {
    let globs = [
        "**/*.js",
        "**/*.ts",
        "**/*.html",
        "**/*.css",
        "**/sfdx-project.json",
    ];
    DidChangeWatchedFilesRegistrationOptions {
        watchers: globs
            .iter()
            .map(|glob| FileSystemWatcher {
                glob_pattern: GlobPattern::String(glob.to_string()),
                kind: None,
            })
            .collect(),
    }
}
