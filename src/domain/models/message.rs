#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use super::Author;

/// A single chat entry. Messages are never edited after creation, replies
/// always arrive as new entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    author: Author,
    text: String,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message {
            author,
            text: text.to_string(),
        };
    }

    pub fn author(&self) -> Author {
        return self.author;
    }

    pub fn text(&self) -> &str {
        return &self.text;
    }

    /// Text with tabs expanded so terminal column math stays correct.
    pub fn display_text(&self) -> String {
        return self.text.replace('\t', "  ");
    }
}

/// Word wraps a single line so no output line is wider than `width`
/// characters. Words that can never fit are broken up.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = vec![];
    let mut current = String::new();
    let mut current_len = 0;
    let mut started = false;

    for word in line.split(' ') {
        let mut word = word.to_string();
        let mut word_len = word.chars().count();

        while word_len > width {
            if started {
                lines.push(current.trim_end().to_string());
                current = String::new();
                current_len = 0;
                started = false;
            }

            lines.push(word.chars().take(width).collect());
            word = word.chars().skip(width).collect();
            word_len -= width;
        }

        if started && current_len + 1 + word_len > width {
            lines.push(current.trim_end().to_string());
            current = String::new();
            current_len = 0;
            started = false;
        }

        if started {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(&word);
        current_len += word_len;
        started = true;
    }

    if started || lines.is_empty() {
        lines.push(current.trim_end().to_string());
    }

    return lines;
}
