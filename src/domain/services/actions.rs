#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::future::Future;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::domain::models::Action;
use crate::domain::models::BackendArc;
use crate::domain::models::Event;
use crate::domain::models::SendRequest;

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Enter - Send your message.
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

/// Hands a backend result to the UI unless the UI has already shut down.
fn deliver(tx: &mpsc::UnboundedSender<Event>, token: &CancellationToken, event: Event) {
    if token.is_cancelled() {
        tracing::debug!("Chat view is closed, dropping backend result");
        return;
    }

    if tx.send(event).is_err() {
        tracing::debug!("Chat view is gone, dropping backend result");
    }
}

/// Gives up on a backend call once `limit` has passed. Replies are applied in
/// submission order, so a call that never returns would hold back every
/// later one.
async fn within<T>(limit: Option<Duration>, call: impl Future<Output = Result<T>>) -> Result<T> {
    let Some(duration) = limit else {
        return call.await;
    };

    match time::timeout(duration, call).await {
        Ok(res) => return res,
        Err(_) => bail!(format!(
            "Chat API did not answer within {}ms",
            duration.as_millis()
        )),
    }
}

async fn start_session(
    backend: BackendArc,
    tx: mpsc::UnboundedSender<Event>,
    token: CancellationToken,
    limit: Option<Duration>,
) {
    let event = match within(limit, backend.start_session()).await {
        Ok(start) => {
            tracing::info!(
                conversation_id = %start.conversation_id,
                "Chat session started"
            );
            Event::BackendSessionStarted(start)
        }
        Err(err) => {
            tracing::error!(error = ?err, "Failed to start chat");
            Event::BackendSessionFailed()
        }
    };

    deliver(&tx, &token, event);
}

async fn send_message(
    backend: BackendArc,
    request: SendRequest,
    tx: mpsc::UnboundedSender<Event>,
    token: CancellationToken,
    limit: Option<Duration>,
) {
    let event = match within(limit, backend.send_message(&request)).await {
        Ok(reply) => {
            tracing::debug!(seq = request.seq, "Received chat reply");
            Event::BackendReply(request.seq, reply)
        }
        Err(err) => {
            tracing::error!(seq = request.seq, error = ?err, "Failed to send chat message");
            Event::BackendReplyFailed(request.seq)
        }
    };

    deliver(&tx, &token, event);
}

pub struct ActionsService {}

impl ActionsService {
    /// Runs every action as its own task so the UI never waits on the
    /// network. A call that outlives `request_timeout` is reported as failed.
    /// Returns once the token is cancelled or the UI drops its sender.
    pub async fn start(
        backend: BackendArc,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
        token: CancellationToken,
        request_timeout: Option<Duration>,
    ) -> Result<()> {
        loop {
            let action = tokio::select! {
                _ = token.cancelled() => None,
                action = rx.recv() => action,
            };

            let Some(action) = action else {
                return Ok(());
            };

            let worker_backend = backend.clone();
            let worker_tx = tx.clone();
            let worker_token = token.clone();
            match action {
                Action::StartSession() => {
                    tokio::spawn(start_session(
                        worker_backend,
                        worker_tx,
                        worker_token,
                        request_timeout,
                    ));
                }
                Action::SendMessage(request) => {
                    tracing::debug!(seq = request.seq, "Sending chat message");
                    tokio::spawn(send_message(
                        worker_backend,
                        request,
                        worker_tx,
                        worker_token,
                        request_timeout,
                    ));
                }
            }
        }
    }
}
