#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use ratatui::prelude::Rect;

use super::BubbleList;
use super::ChatState;
use super::Scroll;
use crate::domain::models::Action;
use crate::domain::models::Event;

/// Everything the chat view owns: the conversation plus what is needed to
/// draw it.
pub struct AppState {
    pub chat: ChatState,
    pub bubble_list: BubbleList,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub scroll: Scroll,
}

impl AppState {
    pub fn new(username: &str) -> AppState {
        return AppState {
            chat: ChatState::default(),
            bubble_list: BubbleList::new(username),
            last_known_height: 0,
            last_known_width: 0,
            scroll: Scroll::default(),
        };
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants(false);
    }

    pub fn begin_session(&mut self) -> Option<Action> {
        return self.chat.begin_session();
    }

    /// Submits the user's input. The message is shown right away and the
    /// view jumps to it.
    pub fn submit(&mut self, text: &str) -> Option<Action> {
        let action = self.chat.submit(text);
        if action.is_some() {
            self.sync_dependants(true);
        }

        return action;
    }

    /// Applies a result coming back from the backend. Returns whether the
    /// transcript changed.
    pub fn handle_backend_event(&mut self, event: Event) -> bool {
        let follow = self.scroll.is_at_bottom();
        let changed = match event {
            Event::BackendSessionStarted(start) => self.chat.apply_session_start(start),
            Event::BackendSessionFailed() => {
                self.chat.apply_session_failure();
                false
            }
            Event::BackendReply(seq, reply) => self.chat.apply_reply(seq, reply),
            Event::BackendReplyFailed(seq) => self.chat.apply_reply_failure(seq),
            _ => false,
        };

        if changed {
            self.sync_dependants(follow);
        }

        return changed;
    }

    pub fn shutdown(&mut self) {
        self.chat.shutdown();
    }

    fn sync_dependants(&mut self, scroll_to_last: bool) {
        self.bubble_list.set_messages(
            self.chat.transcript().as_slice(),
            self.last_known_width.into(),
        );

        self.scroll.set_state(
            u16::try_from(self.bubble_list.len()).unwrap_or(u16::MAX),
            self.last_known_height,
        );

        if scroll_to_last {
            self.scroll.last();
        }
    }
}
