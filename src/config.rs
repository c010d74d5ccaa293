//! Configuration management for Wayfinder.
//!
//! Configuration can be set via environment variables:
//! - `SERPAPI_API_KEY` - Required. SerpAPI key for the flight and hotel search tools.
//! - `SENDGRID_API_KEY` - Required. SendGrid key for email delivery.
//! - `OLLAMA_URL` - Optional. Base URL of the Ollama server. Defaults to `http://127.0.0.1:11434`.
//! - `AGENT_MODEL` - Optional. Model used for planning and email formatting. Defaults to `llama3.1:8b`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_DECISION_STEPS` - Optional. Decision steps allowed per invocation. Defaults to `5`.
//! - `MODEL_TIMEOUT_SECS` - Optional. Timeout for model calls in seconds. Defaults to `30`.
//! - `PARALLEL_TOOLS` - Optional. Run a decision's tool calls concurrently. Defaults to `false`.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// SerpAPI key for the search tools
    pub serpapi_api_key: String,

    /// SendGrid key for email delivery
    pub sendgrid_api_key: String,

    /// Base URL of the Ollama server
    pub ollama_url: String,

    /// Model identifier used for planning and email formatting
    pub agent_model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Decision steps allowed per invocation
    pub max_decision_steps: usize,

    /// Timeout for model calls
    pub model_timeout: Duration,

    /// Run a decision's tool calls concurrently
    pub parallel_tools: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `SERPAPI_API_KEY` or
    /// `SENDGRID_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let serpapi_api_key = std::env::var("SERPAPI_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("SERPAPI_API_KEY".to_string()))?;

        let sendgrid_api_key = std::env::var("SENDGRID_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("SENDGRID_API_KEY".to_string()))?;

        let ollama_url =
            std::env::var("OLLAMA_URL").unwrap_or_else(|_| "http://127.0.0.1:11434".to_string());

        let agent_model = std::env::var("AGENT_MODEL").unwrap_or_else(|_| "llama3.1:8b".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_decision_steps = std::env::var("MAX_DECISION_STEPS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MAX_DECISION_STEPS".to_string(), format!("{}", e))
            })?;

        let model_timeout_secs: u64 = std::env::var("MODEL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("MODEL_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?;

        let parallel_tools = std::env::var("PARALLEL_TOOLS")
            .ok()
            .map(|v| {
                parse_bool(&v)
                    .map_err(|e| ConfigError::InvalidValue("PARALLEL_TOOLS".to_string(), e))
            })
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            serpapi_api_key,
            sendgrid_api_key,
            ollama_url,
            agent_model,
            host,
            port,
            max_decision_steps,
            model_timeout: Duration::from_secs(model_timeout_secs),
            parallel_tools,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(serpapi_api_key: String, sendgrid_api_key: String) -> Self {
        Self {
            serpapi_api_key,
            sendgrid_api_key,
            ollama_url: "http://127.0.0.1:11434".to_string(),
            agent_model: "llama3.1:8b".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_decision_steps: 5,
            model_timeout: Duration::from_secs(30),
            parallel_tools: false,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(format!("expected boolean-like value, got: {}", other)),
    }
}
