//! Conversation state shared across workflow nodes.
//!
//! The message log is append-only: nodes push new entries to the end and
//! never rewrite history. Order defines conversational causality: a tool
//! result always follows the agent decision that requested it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool invocation requested by the model inside an agent decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlates the later tool result to this call.
    pub id: String,

    /// Registry name of the tool to invoke.
    pub name: String,

    /// Opaque key/value arguments interpreted by the tool.
    pub arguments: Value,
}

/// One entry in the conversation log.
///
/// A closed tagged union so every node can match exhaustively on entry kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Message {
    /// A system directive (never persisted by the engine itself; directives
    /// are prepended per model call).
    System { content: String },

    /// Caller input, and the terminal delivery report.
    Human { content: String },

    /// An agent decision. Empty `tool_calls` means this is the final answer.
    Agent {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },

    /// The outcome of one tool call, tagged with its originating call id.
    Tool {
        call_id: String,
        tool_name: String,
        content: String,
    },
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::Human {
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Agent {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self::Tool {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            content: content.into(),
        }
    }

    /// The textual content of the entry, whatever its kind.
    pub fn content(&self) -> &str {
        match self {
            Self::System { content }
            | Self::Human { content }
            | Self::Agent { content, .. }
            | Self::Tool { content, .. } => content,
        }
    }

    /// Tool calls carried by this entry (empty for non-agent entries).
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Agent { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }
}

/// The unit of persistence: one thread's full conversation plus the
/// delivery parameters supplied at approval time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Ordered, append-only message log.
    pub messages: Vec<Message>,

    /// Sender address; set only when delivery is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,

    /// Recipient address; set only when delivery is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_email: Option<String>,

    /// Subject line; set only when delivery is requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_subject: Option<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry to the end of the log.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append several entries, preserving their order.
    pub fn append_all(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// The most recent entry, if any.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Tool calls requested by the latest agent decision.
    ///
    /// Empty when the last entry is not an agent decision or carries none.
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        self.last_message().map(Message::tool_calls).unwrap_or(&[])
    }

    /// Record the delivery parameters supplied at approval time.
    pub fn set_delivery(&mut self, from_email: &str, to_email: &str, email_subject: &str) {
        self.from_email = Some(from_email.to_string());
        self.to_email = Some(to_email.to_string());
        self.email_subject = Some(email_subject.to_string());
    }
}
