//! Shared discussion history

use crate::session::entities::Message;
use serde::{Deserialize, Serialize};

/// Append-only chronological record of a discussion (Entity)
///
/// Insertion order is discussion order. There is no way to remove or
/// edit an entry once appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscussionHistory {
    messages: Vec<Message>,
}

impl DiscussionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// The last `n` messages, oldest first. Returns everything when fewer exist.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Render messages as prompt context: one `"{speaker}: {content}"` line each.
    pub fn render(messages: &[Message]) -> String {
        messages
            .iter()
            .map(|m| format!("{}: {}", m.speaker_label(), m.content()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render the last `n` messages
    pub fn render_recent(&self, n: usize) -> String {
        Self::render(self.recent(n))
    }

    /// Render the whole history
    pub fn render_all(&self) -> String {
        Self::render(&self.messages)
    }
}
