//! Chat backend adapters
//!
//! Implementations of the [`ChatBackend`](jury_application::ChatBackend)
//! port for each supported [`Provider`](jury_domain::Provider).

pub mod decode;
mod factory;
mod ollama;
mod openai;
mod reader;
#[cfg(test)]
mod test_server;

pub use factory::BackendFactory;
pub use ollama::{DEFAULT_OLLAMA_URL, OllamaBackend};
pub use openai::{DEFAULT_OPENAI_KEY_ENV, DEFAULT_OPENAI_URL, OpenAiBackend};

use jury_domain::Message;
use serde_json::{Value, json};

/// Upper bound on how much of an error body is kept
const MAX_ERROR_BODY: usize = 2048;

/// Chat messages in the `{role, content}` shape both providers accept
pub(crate) fn wire_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|m| json!({"role": m.role().as_str(), "content": m.content()}))
        .collect()
}

pub(crate) async fn read_error_body(response: reqwest::Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push_str("...");
    }
    body
}
