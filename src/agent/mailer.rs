//! Email composition and dispatch.

use super::prompt::EMAIL_BODY_PROMPT;
use crate::conversation::Message;
use crate::llm::{ChatOptions, LlmClient};
use crate::mail::EmailProvider;

/// Transform the plan into an HTML body and hand it to the provider.
///
/// Never fails: a transformation or delivery error becomes the terminal
/// message text, so the thread reaches its terminal state either way and
/// the caller reads the outcome from the message content.
pub async fn compose_and_send(
    llm: &dyn LlmClient,
    provider: &dyn EmailProvider,
    plan: &str,
    from: &str,
    to: &str,
    subject: &str,
) -> Message {
    let transform = [Message::system(EMAIL_BODY_PROMPT), Message::human(plan)];
    let options = ChatOptions {
        temperature: Some(0.1),
    };

    let html_body = match llm.chat(&transform, None, options).await {
        Ok(response) => response.content,
        Err(error) => {
            tracing::warn!(%error, "email body transformation failed");
            return Message::human(format!("Error sending email: {}", error));
        }
    };

    match provider.send(from, to, subject, &html_body).await {
        Ok(status) => {
            tracing::info!(status = status.status_code, to, "plan emailed");
            Message::human(html_body)
        }
        Err(error) => {
            tracing::warn!(%error, "email delivery failed");
            Message::human(format!("Error sending email: {}", error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ChatResponse, LlmError, ToolSchema};
    use crate::mail::{DeliveryError, DeliveryStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FormatterModel {
        html: &'static str,
        seen_temperature: Mutex<Option<f32>>,
    }

    #[async_trait]
    impl LlmClient for FormatterModel {
        async fn chat(
            &self,
            messages: &[Message],
            tools: Option<&[ToolSchema]>,
            options: ChatOptions,
        ) -> Result<ChatResponse, LlmError> {
            assert!(tools.is_none(), "formatter call advertises no tools");
            assert!(messages[0].content().contains("HTML email body"));
            *self.seen_temperature.lock().unwrap() = options.temperature;
            Ok(ChatResponse {
                content: self.html.to_string(),
                tool_calls: vec![],
            })
        }
    }

    struct UnavailableModel;

    #[async_trait]
    impl LlmClient for UnavailableModel {
        async fn chat(
            &self,
            _messages: &[Message],
            _tools: Option<&[ToolSchema]>,
            _options: ChatOptions,
        ) -> Result<ChatResponse, LlmError> {
            Err(LlmError::Unavailable("connection refused".into()))
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        reject: bool,
        sent: Mutex<Vec<(String, String, String, String)>>,
    }

    #[async_trait]
    impl EmailProvider for RecordingMailer {
        async fn send(
            &self,
            from: &str,
            to: &str,
            subject: &str,
            html_body: &str,
        ) -> Result<DeliveryStatus, DeliveryError> {
            if self.reject {
                return Err(DeliveryError::Rejected {
                    status: 401,
                    body: "bad api key".into(),
                });
            }
            self.sent.lock().unwrap().push((
                from.to_string(),
                to.to_string(),
                subject.to_string(),
                html_body.to_string(),
            ));
            Ok(DeliveryStatus { status_code: 202 })
        }
    }

    #[tokio::test]
    async fn sends_transformed_body_and_reports_it() {
        let model = FormatterModel {
            html: "<h2>Flights</h2>",
            seen_temperature: Mutex::new(None),
        };
        let mailer = RecordingMailer::default();

        let terminal = compose_and_send(
            &model,
            &mailer,
            "## Flights",
            "agent@x.com",
            "traveler@x.com",
            "Trip",
        )
        .await;

        assert_eq!(terminal, Message::human("<h2>Flights</h2>"));
        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "agent@x.com");
        assert_eq!(sent[0].1, "traveler@x.com");
        assert_eq!(sent[0].2, "Trip");
        assert_eq!(sent[0].3, "<h2>Flights</h2>");
        assert_eq!(*model.seen_temperature.lock().unwrap(), Some(0.1));
    }

    #[tokio::test]
    async fn transformation_failure_is_contained_and_skips_delivery() {
        let mailer = RecordingMailer::default();

        let terminal = compose_and_send(
            &UnavailableModel,
            &mailer,
            "## Flights",
            "a@x.com",
            "b@x.com",
            "Trip",
        )
        .await;

        assert!(terminal
            .content()
            .starts_with("Error sending email: model endpoint unavailable"));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delivery_rejection_is_contained() {
        let model = FormatterModel {
            html: "<p>plan</p>",
            seen_temperature: Mutex::new(None),
        };
        let mailer = RecordingMailer {
            reject: true,
            ..Default::default()
        };

        let terminal =
            compose_and_send(&model, &mailer, "plan", "a@x.com", "b@x.com", "Trip").await;

        assert!(terminal.content().starts_with("Error sending email:"));
        assert!(terminal.content().contains("bad api key"));
    }
}
