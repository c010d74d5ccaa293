//! # Wayfinder
//!
//! A checkpointed travel-planning agent with a human approval gate.
//!
//! This library provides:
//! - An HTTP API for starting, inspecting and approving trip plans
//! - A tool-calling decision loop over flight and hotel search
//! - Integration with Ollama for LLM access and SendGrid for delivery
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern with an interrupt:
//! 1. Receive a trip query via the API
//! 2. Call the LLM, execute any flight or hotel searches it requests
//! 3. Checkpoint after every step, repeat until a plan comes back
//! 4. Park the thread until a human approves, then email the plan
//!
//! ## Example
//!
//! ```rust,ignore
//! use wayfinder::{agent::TravelAgent, config::Config};
//!
//! let config = Config::from_env()?;
//! let agent = TravelAgent::from_config(&config)?;
//! let paused = agent.start("trip-1", "Find flights from ATL to CDG").await?;
//! let done = agent.resume("trip-1", "me@x.com", "you@x.com", "Paris trip").await?;
//! ```

pub mod agent;
pub mod api;
pub mod checkpoint;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod mail;
pub mod tools;

pub use config::Config;
