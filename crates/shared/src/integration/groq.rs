use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, info, warn};

use crate::{
    abstract_trait::{ChatProviderTrait, ChatStream},
    config::GroqConfig,
    domain::request::{ChatMessage, ChatRole},
    utils::AppError,
};

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct GroqProvider {
    api_key: String,
    model: String,
    client: Client,
}

impl GroqProvider {
    pub fn new(config: &GroqConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            client,
        })
    }
}

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct GroqMessage {
    role: &'static str,
    content: String,
}

impl From<ChatMessage> for GroqMessage {
    fn from(value: ChatMessage) -> Self {
        let role = match value.role {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };

        GroqMessage {
            role,
            content: value.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GroqChunk {
    #[serde(default)]
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    delta: GroqDelta,
}

#[derive(Debug, Deserialize)]
struct GroqDelta {
    content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Delta(String),
    Done,
}

/// Interprets one line of an OpenAI-style event stream. Comments, blank
/// lines and chunks without content yield `None`.
pub fn parse_stream_line(line: &str) -> Option<StreamEvent> {
    let payload = line.trim().strip_prefix("data:")?.trim();

    if payload == "[DONE]" {
        return Some(StreamEvent::Done);
    }

    match serde_json::from_str::<GroqChunk>(payload) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .filter_map(|choice| choice.delta.content)
            .reduce(|mut acc, part| {
                acc.push_str(&part);
                acc
            })
            .filter(|content| !content.is_empty())
            .map(StreamEvent::Delta),
        Err(e) => {
            warn!("Skipping malformed stream chunk: {e}");
            None
        }
    }
}

#[async_trait]
impl ChatProviderTrait for GroqProvider {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> Result<ChatStream, AppError> {
        let request = GroqRequest {
            model: self.model.clone(),
            messages: messages.into_iter().map(GroqMessage::from).collect(),
            stream: true,
            temperature: 0.7,
            max_tokens: 1024,
        };

        info!("Sending chat request to Groq with model {}", self.model);

        let response = self
            .client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("Groq API error {status}: {body}");
            return Err(AppError::UpstreamError(format!("Groq returned {status}")));
        }

        let (tx, rx) = mpsc::channel::<Result<String, AppError>>(32);
        let mut bytes = response.bytes_stream();

        tokio::spawn(async move {
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        error!("Groq stream interrupted: {e}");
                        let _ = tx.send(Err(AppError::from(e))).await;
                        return;
                    }
                };

                buffer.extend_from_slice(&chunk);

                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();

                    match parse_stream_line(&String::from_utf8_lossy(&line)) {
                        Some(StreamEvent::Delta(content)) => {
                            if tx.send(Ok(content)).await.is_err() {
                                info!("Chat client went away, stopping stream");
                                return;
                            }
                        }
                        Some(StreamEvent::Done) => return,
                        None => {}
                    }
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_content_delta() {
        let line = r#"data: {"id":"x","choices":[{"index":0,"delta":{"content":"Halo"}}]}"#;

        assert_eq!(
            parse_stream_line(line),
            Some(StreamEvent::Delta("Halo".to_string()))
        );
    }

    #[test]
    fn recognizes_terminator() {
        assert_eq!(parse_stream_line("data: [DONE]\n"), Some(StreamEvent::Done));
    }

    #[test]
    fn ignores_noise() {
        assert_eq!(parse_stream_line(""), None);
        assert_eq!(parse_stream_line(": keep-alive"), None);
        assert_eq!(
            parse_stream_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            None
        );
        assert_eq!(parse_stream_line("data: {not json"), None);
    }
}
