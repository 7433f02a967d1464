//! Chat backend port
//!
//! Defines the interface for streaming chat completions from a model provider.

use async_trait::async_trait;
use jury_domain::{Message, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;

/// Channel capacity used by backends when they create a [`StreamHandle`]
pub const STREAM_CHANNEL_CAPACITY: usize = 64;

/// Errors that can occur while talking to a model backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Malformed backend reply: {0}")]
    MalformedReply(String),

    #[error("Stream failed: {0}")]
    Stream(String),

    #[error("Missing credentials: environment variable {0} is not set")]
    MissingCredentials(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl BackendError {
    /// The stream ended without a `Completed` or failure event
    pub fn closed_early() -> Self {
        BackendError::Stream("stream closed before completion".to_string())
    }

    /// Failure event carrying this error across a stream channel
    pub fn into_event(self) -> StreamEvent {
        match self {
            BackendError::Stream(message) => StreamEvent::Error(message),
            BackendError::MalformedReply(message) => StreamEvent::Malformed(message),
            other => StreamEvent::Error(other.to_string()),
        }
    }
}

/// Handle for receiving streaming events from one prompt/response exchange.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. The handle is consumed by value,
/// so a stream cannot be read twice. Dropping it tells the producer to stop.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Create a connected sender/handle pair
    pub fn channel() -> (mpsc::Sender<StreamEvent>, Self) {
        let (tx, rx) = mpsc::channel(STREAM_CHANNEL_CAPACITY);
        (tx, Self::new(rx))
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<String, BackendError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed(text) => {
                    if full_text.is_empty() {
                        return Ok(text);
                    }
                    return Ok(full_text);
                }
                StreamEvent::Error(e) => return Err(BackendError::Stream(e)),
                StreamEvent::Malformed(e) => return Err(BackendError::MalformedReply(e)),
            }
        }
        Err(BackendError::closed_early())
    }
}

/// A model provider able to stream a chat completion
///
/// Implementations (adapters) live in the infrastructure layer. The
/// backend is stateless: callers pass the whole conversation each time.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Start streaming a reply from `model` to `messages`.
    ///
    /// Failures before the first fragment are returned directly; failures
    /// after that arrive as [`StreamEvent::Error`].
    async fn stream_chat(&self, model: &str, messages: &[Message])
    -> Result<StreamHandle, BackendError>;
}
