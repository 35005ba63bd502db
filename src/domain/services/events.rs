#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyEventKind;
use crossterm::event::MouseEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

const TICK: time::Duration = time::Duration::from_millis(500);

/// Maps a key press to what the chat view should do with it. Anything that
/// isn't a hotkey goes to the input box.
pub fn key_to_event(input: Input) -> Event {
    return match (input.key, input.ctrl) {
        (Key::Enter, _) => Event::KeyboardEnter(),
        (Key::Char('c'), true) => Event::KeyboardCTRLC(),
        (Key::Up, _) | (Key::MouseScrollUp, _) => Event::UIScrollUp(),
        (Key::Down, _) | (Key::MouseScrollDown, _) => Event::UIScrollDown(),
        (Key::PageUp, _) | (Key::Char('u'), true) => Event::UIScrollPageUp(),
        (Key::PageDown, _) | (Key::Char('d'), true) => Event::UIScrollPageDown(),
        _ => Event::KeyboardCharInput(input),
    };
}

fn terminal_to_event(event: CrosstermEvent) -> Option<Event> {
    return match event {
        CrosstermEvent::Paste(text) => Some(Event::KeyboardPaste(text)),
        CrosstermEvent::Resize(_, _) => Some(Event::UIResize()),
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(Event::UIScrollUp()),
            MouseEventKind::ScrollDown => Some(Event::UIScrollDown()),
            _ => None,
        },
        // Some terminals report key releases as well, only presses count.
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Release => None,
        CrosstermEvent::Key(key) => Some(key_to_event(key.into())),
        _ => None,
    };
}

/// Single stream of everything the chat view reacts to: terminal input,
/// backend results and a periodic tick to keep redrawing.
pub struct EventsService {
    terminal: EventStream,
    backend: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(backend: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            terminal: EventStream::new(),
            backend,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let event = tokio::select! {
                event = self.backend.recv() => event,
                event = self.terminal.next() => {
                    match event {
                        Some(Ok(terminal_event)) => terminal_to_event(terminal_event),
                        Some(Err(err)) => {
                            tracing::debug!(error = ?err, "Failed to read terminal event");
                            None
                        }
                        None => None,
                    }
                },
                _ = time::sleep(TICK) => Some(Event::UITick()),
            };

            if let Some(event) = event {
                return Ok(event);
            }
        }
    }
}
