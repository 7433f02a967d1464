//! Message entities shared by the discussion history and participant contexts

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single utterance (Entity)
///
/// Fields are private: a message never changes after it has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, author: Option<String>) -> Self {
        Self {
            role,
            content: content.into(),
            author,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content, None)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, None)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, None)
    }

    /// An assistant message attributed to a named speaker
    pub fn assistant_from(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, Some(author.into()))
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Label used when the message is rendered into a prompt.
    ///
    /// Falls back to the role name for unattributed messages (the case prompt).
    pub fn speaker_label(&self) -> &str {
        self.author().unwrap_or(self.role.as_str())
    }
}
