//! OpenAI-compatible chat backend
//!
//! Works with any server exposing `POST /v1/chat/completions` with SSE
//! streaming (OpenAI, vLLM, LM Studio, llama.cpp server, ...).

use super::decode::decode_openai_line;
use super::reader::spawn_reader;
use super::{read_error_body, wire_messages};
use async_trait::async_trait;
use jury_application::{BackendError, ChatBackend, StreamHandle};
use jury_domain::Message;
use serde_json::json;
use tracing::debug;

pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Read the API key from the environment variable `api_key_env`
    pub fn from_env(base_url: impl Into<String>, api_key_env: &str) -> Result<Self, BackendError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BackendError::MissingCredentials(api_key_env.to_string()))?;
        Ok(Self::new(base_url, api_key))
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
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
        debug!(%url, model, messages = messages.len(), "OpenAI chat request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
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

        Ok(spawn_reader("openai", response, decode_openai_line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_server::{StubResponse, serve_once};

    fn sse(fragments: &[&str]) -> Vec<String> {
        let mut chunks: Vec<String> = fragments
            .iter()
            .map(|f| {
                format!(
                    "data: {}\n\n",
                    json!({"choices": [{"index": 0, "delta": {"content": f}, "finish_reason": null}]})
                )
            })
            .collect();
        chunks.push("data: [DONE]\n\n".to_string());
        chunks
    }

    #[tokio::test]
    async fn test_streams_sse_reply() {
        let (url, server) =
            serve_once(StubResponse::ok("text/event-stream", sse(&["Guil", "ty"]))).await;
        let backend = OpenAiBackend::new(url, "sk-test");

        let handle = backend
            .stream_chat(
                "gpt-4o-mini",
                &[Message::user("Case?"), Message::assistant("Hmm"), Message::user("Again?")],
            )
            .await
            .unwrap();
        assert_eq!(handle.collect_text().await.unwrap(), "Guilty");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.to_lowercase().contains("authorization: bearer sk-test"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][1]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let (url, _server) = serve_once(StubResponse::status(
            401,
            r#"{"error":{"message":"Incorrect API key"}}"#,
        ))
        .await;

        let result = OpenAiBackend::new(url, "bad")
            .stream_chat("gpt-4o-mini", &[Message::user("hi")])
            .await;
        assert!(matches!(result, Err(BackendError::Http { status: 401, .. })));
    }

    #[test]
    fn test_missing_key_env() {
        let result = OpenAiBackend::from_env(DEFAULT_OPENAI_URL, "JURY_TEST_KEY_THAT_IS_NOT_SET");
        assert!(matches!(
            result,
            Err(BackendError::MissingCredentials(name)) if name == "JURY_TEST_KEY_THAT_IS_NOT_SET"
        ));
    }
}
