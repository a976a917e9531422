pub mod capabilities;
pub mod completion;
pub mod goto;
pub mod hover;
pub mod indexer;
pub mod options;
pub mod util;

use crate::capabilities::{CLEAR_INDEX_COMMAND, REINDEX_COMMAND};
use crate::options::InitializationOptions;
use crate::util::{Document, apply_changes, uri_to_path};
use dashmap::DashMap;
use std::sync::Arc;
use tagscope_api::MetadataCompiler;
use tagscope_core::{TagscopeError, WorkspaceSession};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::{Error, ErrorCode, Result};
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

pub struct LspServer {
    client: Client,
    compiler: Arc<dyn MetadataCompiler>,
    pub session: Arc<RwLock<Option<Arc<WorkspaceSession>>>>,
    pub documents: DashMap<Url, Arc<Document>>,
    options: RwLock<InitializationOptions>,
}

impl LspServer {
    pub fn new(client: Client, compiler: Arc<dyn MetadataCompiler>) -> Self {
        Self {
            client,
            compiler,
            session: Arc::new(RwLock::new(None)),
            documents: DashMap::new(),
            options: RwLock::new(InitializationOptions::default()),
        }
    }

    pub async fn session(&self) -> Option<Arc<WorkspaceSession>> {
        self.session.read().await.clone()
    }

    async fn log(&self, level: MessageType, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("{}", message);
        self.client.log_message(level, message).await;
    }
}

/// Core errors only become protocol errors here.
fn to_rpc_error(err: TagscopeError) -> Error {
    Error {
        code: ErrorCode::InternalError,
        message: err.to_string().into(),
        data: None,
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for LspServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let options = InitializationOptions::from_value(params.initialization_options);
        let root_path = params
            .root_uri
            .as_ref()
            .and_then(uri_to_path)
            .or_else(|| {
                params
                    .workspace_folders
                    .as_ref()
                    .and_then(|folders| folders.first())
                    .and_then(|folder| uri_to_path(&folder.uri))
            });

        if let Some(root) = root_path {
            tracing::info!("Initializing workspace session for {}", root.display());
            let session =
                WorkspaceSession::on_disk(options.session_config(root), self.compiler.clone());
            *self.session.write().await = Some(session);
        } else {
            tracing::warn!("Client did not send a workspace root, indexing disabled");
        }
        *self.options.write().await = options;

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "Tagscope".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: capabilities::server_capabilities(),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let registration = Registration {
            id: "tagscope-watched-files".to_string(),
            method: "workspace/didChangeWatchedFiles".to_string(),
            register_options: serde_json::to_value(capabilities::file_watchers()).ok(),
        };
        if let Err(e) = self.client.register_capability(vec![registration]).await {
            self.log(
                MessageType::WARNING,
                format!("Failed to register file watchers: {}", e),
            )
            .await;
        }

        let Some(session) = self.session().await else {
            return;
        };
        let delayed = self.options.read().await.delayed_initialization;
        indexer::spawn_indexer(session, self.client.clone(), delayed);
    }

    async fn shutdown(&self) -> Result<()> {
        if let Some(session) = self.session().await {
            session.shutdown().await.map_err(to_rpc_error)?;
        }
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let doc = Document::for_uri(&uri, params.text_document.text, params.text_document.version);

        if let (Some(session), Some(path)) = (self.session().await, uri_to_path(&uri)) {
            session.on_document_opened(&path, &doc.content).await;
        }
        self.documents.insert(uri, Arc::new(doc));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let Some(previous) = self.documents.get(&uri).map(|d| d.clone()) else {
            return;
        };
        let content = apply_changes(&previous.content, &params.content_changes);

        if let (Some(session), Some(path)) = (self.session().await, uri_to_path(&uri)) {
            session.on_document_changed(&path, &content).await;
        }
        let doc = Document::new(content, previous.language.clone(), params.text_document.version);
        self.documents.insert(uri, Arc::new(doc));
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        if let (Some(session), Some(path)) = (
            self.session().await,
            uri_to_path(&params.text_document.uri),
        ) {
            session.on_document_saved(&path).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;
        self.documents.remove(&uri);
        if let (Some(session), Some(path)) = (self.session().await, uri_to_path(&uri)) {
            session.on_document_closed(&path).await;
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        let Some(session) = self.session().await else {
            return;
        };
        for event in params.changes {
            let Some(path) = uri_to_path(&event.uri) else {
                continue;
            };
            match event.typ {
                FileChangeType::CREATED => session.on_file_created(&path).await,
                FileChangeType::CHANGED => session.on_file_changed(&path).await,
                FileChangeType::DELETED => session.on_file_deleted(&path).await,
                _ => {}
            }
        }
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        hover::hover(self, params).await
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let result = completion::completion(self, params).await;
        if let Ok(Some(CompletionResponse::Array(items))) = &result {
            tracing::debug!("completion: offering {} components", items.len());
        }
        result
    }

    async fn goto_definition(
        &self,
        params: GotoDefinitionParams,
    ) -> Result<Option<GotoDefinitionResponse>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let pos = params.text_document_position_params.position;
        tracing::debug!(
            "textDocument/definition uri={} pos={}:{}",
            uri,
            pos.line,
            pos.character
        );
        goto::definition(self, params).await
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<serde_json::Value>> {
        let Some(session) = self.session().await else {
            return Err(Error::invalid_request());
        };
        match params.command.as_str() {
            REINDEX_COMMAND => {
                let stats = session.reindex().await.map_err(to_rpc_error)?;
                self.log(
                    MessageType::INFO,
                    format!("Reindexed {} components", stats.total),
                )
                .await;
                Ok(Some(serde_json::json!({ "components": stats.total })))
            }
            CLEAR_INDEX_COMMAND => {
                session.clear_index().await.map_err(to_rpc_error)?;
                self.log(MessageType::INFO, "Component index cleared").await;
                Ok(None)
            }
            other => Err(Error::invalid_params(format!("Unknown command: {}", other))),
        }
    }
}

pub async fn run_server(
    compiler: Arc<dyn MetadataCompiler>,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) =
        tower_lsp::LspService::new(move |client| LspServer::new(client, compiler.clone()));
    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;

    Ok(())
}
