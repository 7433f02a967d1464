//! Ollama chat backend
//!
//! Streams replies from a local (or remote) Ollama server via
//! `POST /api/chat` with `"stream": true`.

use super::decode::decode_ollama_line;
use super::reader::spawn_reader;
use super::{read_error_body, wire_messages};
use async_trait::async_trait;
use jury_application::{BackendError, ChatBackend, StreamHandle};
use jury_domain::Message;
use serde_json::json;
use tracing::debug;

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }
}

impl Default for OllamaBackend {
    fn default() -> Self {
        Self::new(DEFAULT_OLLAMA_URL)
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn stream_chat(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<StreamHandle, BackendError> {
        let url = self.chat_url();
        let body = json!({
            "model": model,
            "messages": wire_messages(messages),
            "stream": true,
        });
        debug!(%url, model, messages = messages.len(), "Ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Connection(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: read_error_body(response).await,
            });
        }

        Ok(spawn_reader("ollama", response, decode_ollama_line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_server::{StubResponse, closed_port_url, serve_once};
    use jury_domain::StreamEvent;

    fn ndjson(parts: &[(&str, bool)]) -> Vec<String> {
        parts
            .iter()
            .map(|(content, done)| {
                format!(
                    "{}\n",
                    json!({"model": "m", "message": {"role": "assistant", "content": content}, "done": done})
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_streams_fragments_in_order() {
        let (url, server) = serve_once(StubResponse::ok(
            "application/x-ndjson",
            ndjson(&[("VER", false), ("DICT: ", false), ("yes", false), ("", true)]),
        ))
        .await;
        let backend = OllamaBackend::new(url);

        let mut handle = backend
            .stream_chat("qwen2.5:3b", &[Message::user("Case?")])
            .await
            .unwrap();

        let mut events = Vec::new();
        while let Some(event) = handle.receiver.recv().await {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                StreamEvent::Delta("VER".into()),
                StreamEvent::Delta("DICT: ".into()),
                StreamEvent::Delta("yes".into()),
                StreamEvent::Completed("VERDICT: yes".into()),
            ]
        );

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/chat"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["model"], "qwen2.5:3b");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0], json!({"role": "user", "content": "Case?"}));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (url, _server) =
            serve_once(StubResponse::status(404, r#"{"error":"model 'x' not found"}"#)).await;
        let backend = OllamaBackend::new(url);

        let result = backend.stream_chat("x", &[Message::user("hi")]).await;
        match result {
            Err(BackendError::Http { status, body }) => {
                assert_eq!(status, 404);
                assert!(body.contains("not found"));
            }
            _ => panic!("expected HTTP error"),
        }
    }

    #[tokio::test]
    async fn test_error_line_mid_stream() {
        let mut chunks = ndjson(&[("partial", false)]);
        chunks.push("{\"error\":\"out of memory\"}\n".to_string());
        let (url, _server) = serve_once(StubResponse::ok("application/x-ndjson", chunks)).await;

        let handle = OllamaBackend::new(url)
            .stream_chat("m", &[Message::user("hi")])
            .await
            .unwrap();
        assert_eq!(
            handle.collect_text().await,
            Err(BackendError::Stream("out of memory".into()))
        );
    }

    #[tokio::test]
    async fn test_undecodable_line_reported_as_malformed() {
        let mut chunks = ndjson(&[("partial", false)]);
        chunks.push("this is not json\n".to_string());
        let (url, _server) = serve_once(StubResponse::ok("application/x-ndjson", chunks)).await;

        let handle = OllamaBackend::new(url)
            .stream_chat("m", &[Message::user("hi")])
            .await
            .unwrap();
        assert!(matches!(
            handle.collect_text().await,
            Err(BackendError::MalformedReply(line)) if line.contains("this is not json")
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let backend = OllamaBackend::new(closed_port_url().await);
        let result = backend.stream_chat("m", &[Message::user("hi")]).await;
        assert!(matches!(result, Err(BackendError::Connection(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = OllamaBackend::new("http://localhost:11434/");
        assert_eq!(backend.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(OllamaBackend::default().base_url(), DEFAULT_OLLAMA_URL);
    }
}
