//! Wire decoding for streamed chat replies
//!
//! Both providers stream line-oriented bodies: Ollama sends one JSON object
//! per line (NDJSON), OpenAI-compatible servers send Server-Sent Events.
//! [`LineBuffer`] reassembles lines from arbitrary byte chunks and the
//! `decode_*_line` functions turn one line into a [`Decoded`] step.

use jury_application::BackendError;
use serde_json::Value;

/// Reassembles complete lines from a chunked byte stream.
///
/// Bytes are buffered until a `\n` arrives, so multi-byte UTF-8 characters
/// split across chunks are decoded intact.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed, without line endings
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.pending.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Whatever is left once the body ends without a trailing newline
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        let text = String::from_utf8_lossy(&rest).trim_end_matches('\r').to_string();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// One decoded line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Text to forward, if the line carried any
    pub fragment: Option<String>,
    /// The server marked the reply complete
    pub done: bool,
}

impl Decoded {
    fn skip() -> Self {
        Self::default()
    }

    fn done() -> Self {
        Self {
            fragment: None,
            done: true,
        }
    }
}

/// Signature shared by the per-provider line decoders
pub type LineDecoder = fn(&str) -> Result<Decoded, BackendError>;

/// Decode one Ollama `/api/chat` NDJSON line.
///
/// ```text
/// {"model":"llama3.2","message":{"role":"assistant","content":"Hi"},"done":false}
/// ```
pub fn decode_ollama_line(line: &str) -> Result<Decoded, BackendError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Decoded::skip());
    }

    let value: Value = serde_json::from_str(line)
        .map_err(|e| BackendError::MalformedReply(format!("{}: {}", e, line)))?;

    if let Some(error) = value.get("error") {
        return Err(BackendError::Stream(error_text(error)));
    }

    let fragment = value
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let done = value.get("done").and_then(Value::as_bool).unwrap_or(false);

    Ok(Decoded { fragment, done })
}

/// Decode one SSE line from an OpenAI-compatible `/v1/chat/completions` stream.
///
/// Only `data:` lines matter; comments, `event:` lines and blank separators
/// are skipped. `data: [DONE]` ends the reply.
pub fn decode_openai_line(line: &str) -> Result<Decoded, BackendError> {
    let Some(data) = line.strip_prefix("data:") else {
        return Ok(Decoded::skip());
    };
    let data = data.trim();
    if data.is_empty() {
        return Ok(Decoded::skip());
    }
    if data == "[DONE]" {
        return Ok(Decoded::done());
    }

    let value: Value = serde_json::from_str(data)
        .map_err(|e| BackendError::MalformedReply(format!("{}: {}", e, data)))?;

    if let Some(error) = value.get("error") {
        return Err(BackendError::Stream(error_text(error)));
    }

    let fragment = value
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("delta"))
        .and_then(|d| d.get("content"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(Decoded {
        fragment,
        done: false,
    })
}

fn error_text(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}
