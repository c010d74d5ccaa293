//! The decision step: one model turn choosing the next action.

use super::prompt::build_planner_prompt;
use crate::conversation::{ConversationState, Message};
use crate::llm::{ChatOptions, LlmClient, LlmError, ToolSchema};
use chrono::{Datelike, Utc};

/// Take one decision over the conversation so far.
///
/// The planner directive is prepended per call and never persisted. A model
/// failure propagates untouched; the caller appends nothing for the failed
/// step.
pub async fn take_decision(
    llm: &dyn LlmClient,
    schemas: &[ToolSchema],
    state: &ConversationState,
) -> Result<Message, LlmError> {
    let mut messages = Vec::with_capacity(state.messages.len() + 1);
    messages.push(Message::system(build_planner_prompt(Utc::now().year())));
    messages.extend(state.messages.iter().cloned());

    let response = llm
        .chat(&messages, Some(schemas), ChatOptions::default())
        .await?;

    tracing::debug!(
        tool_calls = response.tool_calls.len(),
        "model decision received"
    );
    Ok(Message::agent(response.content, response.tool_calls))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ToolCall;
    use crate::llm::ChatResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Captures the request and answers with a fixed response.
    struct FixedModel {
        response: ChatResponse,
        seen_messages: Mutex<Vec<Message>>,
        seen_tools: Mutex<Vec<String>>,
    }

    impl FixedModel {
        fn new(response: ChatResponse) -> Self {
            Self {
                response,
                seen_messages: Mutex::new(Vec::new()),
                seen_tools: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmClient for FixedModel {
        async fn chat(
            &self,
            messages: &[Message],
            tools: Option<&[ToolSchema]>,
            _options: ChatOptions,
        ) -> Result<ChatResponse, LlmError> {
            *self.seen_messages.lock().unwrap() = messages.to_vec();
            *self.seen_tools.lock().unwrap() = tools
                .unwrap_or_default()
                .iter()
                .map(|t| t.name.clone())
                .collect();
            Ok(self.response.clone())
        }
    }

    fn schema(name: &str) -> ToolSchema {
        ToolSchema {
            name: name.into(),
            description: "test".into(),
            parameters: json!({"type": "object"}),
        }
    }

    #[tokio::test]
    async fn prepends_directive_without_persisting_it() {
        let model = FixedModel::new(ChatResponse {
            content: "## Flights".into(),
            tool_calls: vec![],
        });
        let mut state = ConversationState::new();
        state.append(Message::human("plan a trip"));

        let decision = take_decision(&model, &[schema("flights_finder")], &state)
            .await
            .expect("decision");

        let seen = model.seen_messages.lock().unwrap();
        assert!(matches!(seen[0], Message::System { .. }));
        assert!(seen[0].content().contains("smart travel agency"));
        assert_eq!(seen[1].content(), "plan a trip");
        // The directive is rebuilt per call, not part of the state.
        assert_eq!(state.messages.len(), 1);
        assert_eq!(decision.content(), "## Flights");
    }

    #[tokio::test]
    async fn advertises_registry_schemas_to_the_model() {
        let model = FixedModel::new(ChatResponse::default());
        let schemas = [schema("flights_finder"), schema("hotels_finder")];
        let state = ConversationState::new();

        take_decision(&model, &schemas, &state).await.expect("decision");

        let seen = model.seen_tools.lock().unwrap();
        assert_eq!(*seen, ["flights_finder", "hotels_finder"]);
    }

    #[tokio::test]
    async fn carries_tool_calls_into_the_agent_entry() {
        let model = FixedModel::new(ChatResponse {
            content: "".into(),
            tool_calls: vec![ToolCall {
                id: "c1".into(),
                name: "hotels_finder".into(),
                arguments: json!({"q": "Delhi"}),
            }],
        });
        let state = ConversationState::new();

        let decision = take_decision(&model, &[], &state).await.expect("decision");
        assert_eq!(decision.tool_calls().len(), 1);
        assert_eq!(decision.tool_calls()[0].name, "hotels_finder");
    }

    #[tokio::test]
    async fn model_failure_propagates() {
        struct FailingModel;

        #[async_trait]
        impl LlmClient for FailingModel {
            async fn chat(
                &self,
                _messages: &[Message],
                _tools: Option<&[ToolSchema]>,
                _options: ChatOptions,
            ) -> Result<ChatResponse, LlmError> {
                Err(LlmError::Timeout)
            }
        }

        let state = ConversationState::new();
        let err = take_decision(&FailingModel, &[], &state).await.unwrap_err();
        assert!(matches!(err, LlmError::Timeout));
    }
}
