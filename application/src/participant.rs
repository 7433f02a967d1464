//! Live discussion participants
//!
//! A [`Participant`] pairs a panel seat with the backend that speaks for it
//! and the participant's own conversation context. The context is private:
//! it is never shared with other participants or with the discussion
//! history.

use crate::ports::backend::{BackendError, ChatBackend, StreamHandle};
use jury_domain::{JudgeSpec, Message, ParticipantSpec, PromptTemplate};
use std::sync::Arc;
use tracing::debug;

/// Participant variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticipantKind {
    /// Regular panel member
    Standard,
    /// Evaluates the discussion; prompts are wrapped in evaluation framing
    Judge {
        /// Advisory only
        verdict_threshold: f32,
    },
}

/// A panel member bound to a backend
pub struct Participant {
    name: String,
    model: String,
    kind: ParticipantKind,
    backend: Arc<dyn ChatBackend>,
    context: Vec<Message>,
}

impl Participant {
    pub fn new(
        name: impl Into<String>,
        model: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            kind: ParticipantKind::Standard,
            backend,
            context: Vec::new(),
        }
    }

    pub fn judge(
        name: impl Into<String>,
        model: impl Into<String>,
        backend: Arc<dyn ChatBackend>,
        verdict_threshold: f32,
    ) -> Self {
        Self {
            kind: ParticipantKind::Judge { verdict_threshold },
            ..Self::new(name, model, backend)
        }
    }

    pub fn from_spec(spec: &ParticipantSpec, backend: Arc<dyn ChatBackend>) -> Self {
        Self::new(&spec.name, &spec.model, backend)
    }

    pub fn from_judge_spec(spec: &JudgeSpec, backend: Arc<dyn ChatBackend>) -> Self {
        Self::judge(
            &spec.participant.name,
            &spec.participant.model,
            backend,
            spec.verdict_threshold,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn kind(&self) -> ParticipantKind {
        self.kind
    }

    pub fn is_judge(&self) -> bool {
        matches!(self.kind, ParticipantKind::Judge { .. })
    }

    pub fn verdict_threshold(&self) -> Option<f32> {
        match self.kind {
            ParticipantKind::Judge { verdict_threshold } => Some(verdict_threshold),
            ParticipantKind::Standard => None,
        }
    }

    /// Everything this participant has been sent and has replied, oldest first
    pub fn context(&self) -> &[Message] {
        &self.context
    }

    /// Send a prompt and start streaming the reply.
    ///
    /// The prompt (wrapped in evaluation framing for judges) is appended to
    /// the private context before the backend is called, and stays there
    /// even if the call fails.
    pub async fn produce(&mut self, prompt: &str) -> Result<StreamHandle, BackendError> {
        let content = match self.kind {
            ParticipantKind::Standard => prompt.to_string(),
            ParticipantKind::Judge { .. } => PromptTemplate::judge_prompt(prompt),
        };
        self.context.push(Message::user(content));

        debug!(
            participant = %self.name,
            model = %self.model,
            backend = self.backend.name(),
            context_len = self.context.len(),
            "Dispatching prompt"
        );

        self.backend.stream_chat(&self.model, &self.context).await
    }

    /// Append the reply to a prompt to the private context
    pub fn record_reply(&mut self, reply: impl Into<String>) {
        self.context.push(Message::assistant(reply));
    }
}

impl std::fmt::Debug for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Participant")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("kind", &self.kind)
            .field("backend", &self.backend.name())
            .field("context_len", &self.context.len())
            .finish()
    }
}
