#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;

use std::slice;

use super::Message;

/// Ordered record of everything shown in the chat. Entries can only be
/// appended.
#[derive(Clone, Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn iter(&self) -> slice::Iter<'_, Message> {
        return self.messages.iter();
    }

    pub fn len(&self) -> usize {
        return self.messages.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.messages.is_empty();
    }

    pub fn last(&self) -> Option<&Message> {
        return self.messages.last();
    }

    pub fn as_slice(&self) -> &[Message] {
        return &self.messages;
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        return self.iter();
    }
}
