#[cfg(test)]
#[path = "bubble_list_test.rs"]
mod tests;

use std::collections::HashMap;

use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::Paragraph;

use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Author;
use crate::domain::models::Message;

/// Rendered lines for every message, cached by transcript index. Messages
/// never change once appended so entries only go stale on a width change.
pub struct BubbleList {
    cache: HashMap<usize, Vec<Line<'static>>>,
    line_width: usize,
    lines_len: usize,
    username: String,
}

impl BubbleList {
    pub fn new(username: &str) -> BubbleList {
        return BubbleList {
            cache: HashMap::new(),
            line_width: 0,
            lines_len: 0,
            username: username.to_string(),
        };
    }

    pub fn set_messages(&mut self, messages: &[Message], line_width: usize) {
        if self.line_width != line_width {
            self.cache.clear();
            self.line_width = line_width;
        }

        self.lines_len = messages
            .iter()
            .enumerate()
            .map(|(idx, message)| {
                if let Some(lines) = self.cache.get(&idx) {
                    return lines.len();
                }

                let (title, align) = match message.author() {
                    Author::User => (self.username.as_str(), BubbleAlignment::Right),
                    Author::Assistant => ("Nectar", BubbleAlignment::Left),
                };

                let bubble_lines = Bubble::new(message, title, align, line_width).as_lines();
                let bubble_line_len = bubble_lines.len();
                self.cache.insert(idx, bubble_lines);

                return bubble_line_len;
            })
            .sum();
    }

    pub fn len(&self) -> usize {
        return self.lines_len;
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let mut indexes: Vec<usize> = self.cache.keys().cloned().collect();
        indexes.sort();

        return indexes
            .iter()
            .flat_map(|idx| {
                return self.cache[idx].to_owned();
            })
            .collect();
    }

    pub fn widget(&self, scroll: u16) -> Paragraph<'static> {
        return Paragraph::new(self.lines())
            .block(Block::default())
            .scroll((scroll, 0));
    }
}
