use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::ActionsService;
use crate::domain::models::Action;
use crate::domain::models::Backend;
use crate::domain::models::BackendArc;
use crate::domain::models::ChatReply;
use crate::domain::models::Event;
use crate::domain::models::SendRequest;
use crate::domain::models::SessionStart;
use crate::domain::services::ChatState;

#[derive(Default)]
struct FakeBackend {
    fail: bool,
    delay: Option<Duration>,
    sent: Mutex<Vec<SendRequest>>,
}

#[async_trait]
impl Backend for FakeBackend {
    #[allow(clippy::implicit_return)]
    async fn start_session(&self) -> Result<SessionStart> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            bail!("connection refused");
        }

        return Ok(SessionStart {
            conversation_id: "abc".to_string(),
            greeting: "Hi".to_string(),
        });
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(&self, request: &SendRequest) -> Result<ChatReply> {
        self.sent.lock().await.push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            bail!("connection refused");
        }

        return Ok(ChatReply {
            text: format!("You said: {}", request.text),
            conversation_id: request.conversation_id.clone(),
        });
    }
}

/// Never answers the first message, answers every other one right away.
struct StallsFirstMessage {}

#[async_trait]
impl Backend for StallsFirstMessage {
    #[allow(clippy::implicit_return)]
    async fn start_session(&self) -> Result<SessionStart> {
        bail!("not used");
    }

    #[allow(clippy::implicit_return)]
    async fn send_message(&self, request: &SendRequest) -> Result<ChatReply> {
        if request.seq == 0 {
            std::future::pending::<()>().await;
        }

        return Ok(ChatReply {
            text: format!("Reply to {}", request.text),
            conversation_id: None,
        });
    }
}

fn send_action(seq: u64, text: &str) -> Action {
    return Action::SendMessage(SendRequest {
        seq,
        text: text.to_string(),
        conversation_id: Some("abc".to_string()),
    });
}

async fn run(backend: BackendArc, actions: Vec<Action>) -> Result<mpsc::UnboundedReceiver<Event>> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    for action in actions {
        action_tx.send(action)?;
    }
    drop(action_tx);

    ActionsService::start(
        backend,
        event_tx,
        &mut action_rx,
        CancellationToken::new(),
        None,
    )
    .await?;

    return Ok(event_rx);
}

#[tokio::test]
async fn it_starts_a_session() -> Result<()> {
    let mut rx = run(Arc::new(FakeBackend::default()), vec![Action::StartSession()]).await?;

    match rx.recv().await {
        Some(Event::BackendSessionStarted(start)) => {
            assert_eq!(start.conversation_id, "abc".to_string());
            assert_eq!(start.greeting, "Hi".to_string());
        }
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_reports_a_failed_session() -> Result<()> {
    let backend = FakeBackend {
        fail: true,
        ..FakeBackend::default()
    };
    let mut rx = run(Arc::new(backend), vec![Action::StartSession()]).await?;

    match rx.recv().await {
        Some(Event::BackendSessionFailed()) => {}
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_sends_a_message() -> Result<()> {
    let backend = Arc::new(FakeBackend::default());
    let mut rx = run(backend.clone(), vec![send_action(7, "Hello")]).await?;

    match rx.recv().await {
        Some(Event::BackendReply(seq, reply)) => {
            assert_eq!(seq, 7);
            assert_eq!(reply.text, "You said: Hello".to_string());
        }
        _ => bail!("Wrong event"),
    }

    let sent = backend.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].conversation_id, Some("abc".to_string()));

    return Ok(());
}

#[tokio::test]
async fn it_reports_a_failed_send() -> Result<()> {
    let backend = FakeBackend {
        fail: true,
        ..FakeBackend::default()
    };
    let mut rx = run(Arc::new(backend), vec![send_action(3, "Hello")]).await?;

    match rx.recv().await {
        Some(Event::BackendReplyFailed(seq)) => assert_eq!(seq, 3),
        _ => bail!("Wrong event"),
    }

    return Ok(());
}

#[tokio::test]
async fn it_drops_results_after_cancellation() -> Result<()> {
    let backend = Arc::new(FakeBackend {
        delay: Some(Duration::from_millis(100)),
        ..FakeBackend::default()
    });
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let token = CancellationToken::new();

    let service_token = token.clone();
    let service = tokio::spawn(async move {
        return ActionsService::start(backend, event_tx, &mut action_rx, service_token, None)
            .await;
    });

    action_tx.send(send_action(0, "Hello"))?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    token.cancel();

    service.await??;

    // The worker finishes after the cancellation and must not deliver.
    assert!(event_rx.recv().await.is_none());

    return Ok(());
}

#[tokio::test]
async fn it_times_out_a_stuck_message_so_later_replies_show() -> Result<()> {
    let mut state = ChatState::default();
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    for text in ["one", "two", "three"] {
        if let Some(action) = state.submit(text) {
            action_tx.send(action)?;
        }
    }
    drop(action_tx);

    ActionsService::start(
        Arc::new(StallsFirstMessage {}),
        event_tx,
        &mut action_rx,
        CancellationToken::new(),
        Some(Duration::from_millis(50)),
    )
    .await?;

    // Ends once every worker, the stuck one included, has reported back.
    while let Some(event) = event_rx.recv().await {
        match event {
            Event::BackendReply(seq, reply) => {
                state.apply_reply(seq, reply);
            }
            Event::BackendReplyFailed(seq) => {
                state.apply_reply_failure(seq);
            }
            _ => bail!("Wrong event"),
        }
    }

    let texts = state
        .transcript()
        .iter()
        .map(|message| return message.text().to_string())
        .collect::<Vec<String>>();
    assert_eq!(
        texts,
        vec!["one", "two", "three", "Reply to two", "Reply to three"]
    );
    assert_eq!(state.pending(), 0);

    return Ok(());
}
