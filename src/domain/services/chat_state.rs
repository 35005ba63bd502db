#[cfg(test)]
#[path = "chat_state_test.rs"]
mod tests;

use std::collections::BTreeMap;

use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ChatReply;
use crate::domain::models::Message;
use crate::domain::models::SendRequest;
use crate::domain::models::Session;
use crate::domain::models::SessionStart;
use crate::domain::models::Transcript;

/// Conversation state owned by the chat view. Every change goes through one
/// of the transitions below, and backend results are only applied while the
/// view is alive.
#[derive(Debug)]
pub struct ChatState {
    transcript: Transcript,
    session: Session,
    session_requested: bool,
    next_seq: u64,
    next_to_apply: u64,
    completed: BTreeMap<u64, Option<String>>,
    alive: bool,
}

impl Default for ChatState {
    fn default() -> ChatState {
        return ChatState {
            transcript: Transcript::default(),
            session: Session::default(),
            session_requested: false,
            next_seq: 0,
            next_to_apply: 0,
            completed: BTreeMap::new(),
            alive: true,
        };
    }
}

impl ChatState {
    pub fn transcript(&self) -> &Transcript {
        return &self.transcript;
    }

    pub fn session(&self) -> &Session {
        return &self.session;
    }

    /// Number of submitted messages whose reply has not been applied yet.
    pub fn pending(&self) -> usize {
        return (self.next_seq - self.next_to_apply) as usize;
    }

    /// Returns the session start request the first time it is called, and
    /// nothing on every call after that.
    pub fn begin_session(&mut self) -> Option<Action> {
        if self.session_requested || !self.alive {
            return None;
        }

        self.session_requested = true;
        return Some(Action::StartSession());
    }

    /// Records the conversation id and seeds the transcript with the greeting.
    pub fn apply_session_start(&mut self, start: SessionStart) -> bool {
        if !self.alive {
            return false;
        }

        if !self.session.assign(&start.conversation_id) {
            tracing::warn!(
                current = self.session.id(),
                received = %start.conversation_id,
                "Ignoring a second chat session"
            );
            return false;
        }

        self.transcript
            .append(Message::new(Author::Assistant, &start.greeting));
        return true;
    }

    pub fn apply_session_failure(&mut self) {
        if !self.alive {
            return;
        }

        tracing::warn!("Continuing without a chat session");
    }

    /// Appends the user's message straight away and returns the request to
    /// send it. Blank input is dropped without a request.
    pub fn submit(&mut self, text: &str) -> Option<Action> {
        if text.trim().is_empty() || !self.alive {
            return None;
        }

        self.transcript.append(Message::new(Author::User, text));

        let seq = self.next_seq;
        self.next_seq += 1;

        return Some(Action::SendMessage(SendRequest {
            seq,
            text: text.to_string(),
            conversation_id: self.session.id().map(|id| return id.to_string()),
        }));
    }

    pub fn apply_reply(&mut self, seq: u64, reply: ChatReply) -> bool {
        if let Some(conversation_id) = &reply.conversation_id {
            if self.session.id() != Some(conversation_id.as_str()) {
                tracing::warn!(
                    seq,
                    current = self.session.id(),
                    received = %conversation_id,
                    "Reply belongs to a different conversation, keeping the current one"
                );
            }
        }

        return self.resolve(seq, Some(reply.text));
    }

    /// Marks a send as finished without a reply. The user's message stays in
    /// the transcript as is.
    pub fn apply_reply_failure(&mut self, seq: u64) -> bool {
        return self.resolve(seq, None);
    }

    /// Stops accepting backend results.
    pub fn shutdown(&mut self) {
        self.alive = false;
        self.completed.clear();
    }

    fn resolve(&mut self, seq: u64, reply: Option<String>) -> bool {
        if !self.alive {
            return false;
        }

        if seq < self.next_to_apply || seq >= self.next_seq || self.completed.contains_key(&seq) {
            tracing::warn!(seq, "Ignoring a reply that was already applied or never sent");
            return false;
        }

        self.completed.insert(seq, reply);

        // Replies are applied in the order their messages were submitted.
        let mut changed = false;
        while let Some(ready) = self.completed.remove(&self.next_to_apply) {
            self.next_to_apply += 1;
            if let Some(text) = ready {
                self.transcript.append(Message::new(Author::Assistant, &text));
                changed = true;
            }
        }

        return changed;
    }
}
