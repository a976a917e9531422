use std::sync::Arc;
use std::time::Instant;
use tagscope_core::{SessionStatus, WorkspaceSession};
use tower_lsp::Client;
use tower_lsp::lsp_types::MessageType;

/// Kick off indexing for `session`, either right away or once the workspace
/// settles, and mirror status changes to the client log.
pub fn spawn_indexer(session: Arc<WorkspaceSession>, client: Client, delayed: bool) {
    spawn_status_reporter(&session, client.clone());

    if delayed {
        session.start_delayed_initialization();
        tokio::spawn(async move {
            client
                .log_message(
                    MessageType::INFO,
                    format!(
                        "Tagscope waiting for {} to settle before indexing",
                        session.root().display()
                    ),
                )
                .await;
        });
        return;
    }

    tokio::spawn(async move {
        let start = Instant::now();
        client
            .log_message(
                MessageType::INFO,
                format!("Tagscope indexing started for {}", session.root().display()),
            )
            .await;

        match session.init().await {
            Ok(Some(stats)) => {
                client
                    .log_message(
                        MessageType::INFO,
                        format!(
                            "Initial indexing complete in {:?}: {} components ({} compiled, {} removed)",
                            start.elapsed(),
                            stats.total,
                            stats.compiled,
                            stats.removed
                        ),
                    )
                    .await;
            }
            Ok(None) => {
                client
                    .log_message(MessageType::LOG, "Indexing already in progress")
                    .await;
            }
            Err(e) => {
                client
                    .log_message(MessageType::ERROR, format!("Initial indexing failed: {}", e))
                    .await;
            }
        }
    });
}

fn spawn_status_reporter(session: &WorkspaceSession, client: Client) {
    let mut status = session.subscribe_status();
    let cancel_token = session.cancel_token();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => break,
                changed = status.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let current = status.borrow_and_update().clone();
                    let (level, message) = match current {
                        SessionStatus::Waiting => (MessageType::LOG, "Waiting for workspace files".to_string()),
                        SessionStatus::Indexing => (MessageType::LOG, "Indexing components".to_string()),
                        SessionStatus::Ready { components } => {
                            (MessageType::INFO, format!("Component index ready: {} components", components))
                        }
                        SessionStatus::Failed(msg) => {
                            (MessageType::ERROR, format!("Component indexing failed: {}", msg))
                        }
                    };
                    client.log_message(level, message).await;
                }
            }
        }
    });
}
