//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to start (or retry) a travel planning thread.
#[derive(Debug, Clone, Deserialize)]
pub struct StartTripRequest {
    /// Thread to create or retry. A fresh id is generated when absent.
    #[serde(default)]
    pub thread_id: Option<String>,

    /// The traveler's query
    pub query: String,
}

/// Request to approve a plan for email delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalRequest {
    /// Sender address
    pub from_email: String,

    /// Recipient address
    pub to_email: String,

    /// Subject line
    pub email_subject: String,
}

/// Response after deleting a thread.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteTripResponse {
    /// Whether a thread existed and was removed
    pub deleted: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_request_thread_id_is_optional() {
        let req: StartTripRequest =
            serde_json::from_str(r#"{"query": "Find flights"}"#).expect("decode");
        assert!(req.thread_id.is_none());
        assert_eq!(req.query, "Find flights");

        let req: StartTripRequest =
            serde_json::from_str(r#"{"thread_id": "t1", "query": "Find flights"}"#).expect("decode");
        assert_eq!(req.thread_id.as_deref(), Some("t1"));
    }

    #[test]
    fn approval_request_requires_all_fields() {
        let missing: Result<ApprovalRequest, _> =
            serde_json::from_str(r#"{"from_email": "a@x.com", "to_email": "b@x.com"}"#);
        assert!(missing.is_err());
    }
}
