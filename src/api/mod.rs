//! HTTP surface for the travel agent.
//!
//! A small JSON API over the workflow: start a planning thread, inspect
//! it, approve the plan for email delivery, or delete it.

mod routes;
mod types;

pub use routes::{router, AppState};
pub use types::{ApprovalRequest, DeleteTripResponse, HealthResponse, StartTripRequest};

use crate::agent::TravelAgent;
use crate::config::Config;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Build the agent from configuration and serve the API until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let agent = TravelAgent::from_config(&config)?;
    let state = Arc::new(AppState { agent });
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
