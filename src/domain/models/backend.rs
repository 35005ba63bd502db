use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::SendRequest;

/// Result of opening a conversation with the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStart {
    pub conversation_id: String,
    pub greeting: String,
}

/// A single reply to a user message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    /// Some backends echo the conversation the reply belongs to.
    pub conversation_id: Option<String>,
}

#[async_trait]
pub trait Backend {
    /// Opens a new conversation and returns its identifier together with the
    /// greeting to seed the chat with.
    async fn start_session(&self) -> Result<SessionStart>;

    /// Sends one user message and waits for the full reply. Nothing is
    /// streamed, and failures are never retried here.
    async fn send_message(&self, request: &SendRequest) -> Result<ChatReply>;
}

pub type BackendArc = Arc<dyn Backend + Send + Sync>;
