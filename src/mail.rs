//! Email delivery boundary and the SendGrid implementation.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryStatus {
    /// HTTP status returned by the provider (SendGrid answers 202).
    pub status_code: u16,
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("email provider request failed: {0}")]
    Transport(String),

    #[error("email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound email boundary. Implementations own auth and the wire format.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<DeliveryStatus, DeliveryError>;
}

/// SendGrid v3 `mail/send` client.
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
}

impl SendGridMailer {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl EmailProvider for SendGridMailer {
    async fn send(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<DeliveryStatus, DeliveryError> {
        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&mail_payload(from, to, subject, html_body))
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(status = status.as_u16(), to, "email accepted by provider");
        Ok(DeliveryStatus {
            status_code: status.as_u16(),
        })
    }
}

fn mail_payload(from: &str, to: &str, subject: &str, html_body: &str) -> Value {
    json!({
        "personalizations": [{ "to": [{ "email": to }] }],
        "from": { "email": from },
        "subject": subject,
        "content": [{ "type": "text/html", "value": html_body }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_sendgrid_v3_shape() {
        let payload = mail_payload(
            "agent@example.com",
            "traveler@example.com",
            "Your trip",
            "<h2>Flights</h2>",
        );
        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "traveler@example.com"
        );
        assert_eq!(payload["from"]["email"], "agent@example.com");
        assert_eq!(payload["subject"], "Your trip");
        assert_eq!(payload["content"][0]["type"], "text/html");
        assert_eq!(payload["content"][0]["value"], "<h2>Flights</h2>");
    }
}
