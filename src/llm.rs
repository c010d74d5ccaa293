//! Model client abstraction and the Ollama implementation.

use crate::conversation::{Message, ToolCall};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// A tool advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's arguments object.
    pub parameters: Value,
}

/// Per-call decoding options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
}

/// One model turn: free text plus any tool calls it requested.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model endpoint unavailable: {0}")]
    Unavailable(String),

    #[error("model call timed out")]
    Timeout,
}

/// Chat-completion boundary. One call, one turn; streaming is not used.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSchema]>,
        options: ChatOptions,
    ) -> Result<ChatResponse, LlmError>;
}

/// Client for Ollama's `/api/chat` endpoint.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn request_body(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSchema]>,
        options: ChatOptions,
    ) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": wire_messages(messages),
            "stream": false,
        });
        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            body["tools"] = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
        }
        if let Some(temperature) = options.temperature {
            body["options"] = json!({ "temperature": temperature });
        }
        body
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn chat(
        &self,
        messages: &[Message],
        tools: Option<&[ToolSchema]>,
        options: ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = self.request_body(messages, tools, options);

        tracing::debug!(model = %self.model, messages = messages.len(), "calling model");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(LlmError::Unavailable(format!(
                "model endpoint returned {}: {}",
                status, detail
            )));
        }

        let reply: ChatReply = response.json().await.map_err(|e| {
            // The client-level timeout can also fire while the body streams.
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Unavailable(format!("malformed model reply: {}", e))
            }
        })?;
        Ok(reply.into_response())
    }
}

/// Map conversation entries to the Ollama message shape.
///
/// Agent entries echo their tool calls back so the model sees which calls
/// produced the tool results that follow.
fn wire_messages(messages: &[Message]) -> Vec<Value> {
    messages
        .iter()
        .map(|message| match message {
            Message::System { content } => json!({ "role": "system", "content": content }),
            Message::Human { content } => json!({ "role": "user", "content": content }),
            Message::Agent {
                content,
                tool_calls,
            } => {
                let mut entry = json!({ "role": "assistant", "content": content });
                if !tool_calls.is_empty() {
                    entry["tool_calls"] = tool_calls
                        .iter()
                        .map(|call| {
                            json!({
                                "function": {
                                    "name": call.name,
                                    "arguments": call.arguments,
                                }
                            })
                        })
                        .collect();
                }
                entry
            }
            Message::Tool { content, .. } => json!({ "role": "tool", "content": content }),
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    message: ReplyMessage,
}

#[derive(Debug, Default, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<ReplyToolCall>,
}

#[derive(Debug, Deserialize)]
struct ReplyToolCall {
    function: ReplyFunction,
}

#[derive(Debug, Deserialize)]
struct ReplyFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl ChatReply {
    /// The wire format carries no call ids, so each call gets a fresh UUID
    /// to correlate its eventual tool result.
    fn into_response(self) -> ChatResponse {
        ChatResponse {
            content: self.message.content,
            tool_calls: self
                .message
                .tool_calls
                .into_iter()
                .map(|call| ToolCall {
                    id: Uuid::new_v4().to_string(),
                    name: call.function.name,
                    arguments: call.function.arguments,
                })
                .collect(),
        }
    }
}
