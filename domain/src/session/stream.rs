//! Streaming events for a single prompt/response exchange.
//!
//! [`StreamEvent`] represents individual events in a streaming model
//! response, so fragments can be displayed as they are generated.

/// An event in a streaming model response.
///
/// Backend adapters translate their wire chunks (Ollama NDJSON lines,
/// OpenAI SSE `data:` lines) into this enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment from the model.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// An error that occurred during streaming.
    Error(String),
    /// A chunk the backend could not decode.
    Malformed(String),
}

impl StreamEvent {
    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed(s) => Some(s),
            StreamEvent::Error(_) | StreamEvent::Malformed(_) => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StreamEvent::Completed(_) | StreamEvent::Error(_) | StreamEvent::Malformed(_)
        )
    }
}
