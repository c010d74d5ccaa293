//! Search tools exposed to the model.

mod flights;
mod hotels;

pub use flights::FlightsFinder;
pub use hotels::HotelsFinder;

use crate::config::Config;
use crate::llm::ToolSchema;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// An external capability the model can invoke with structured arguments.
///
/// Tools return structured JSON rather than prose so the executor can
/// post-process result items before they re-enter the conversation.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name as advertised to the model.
    fn name(&self) -> &str;

    /// Description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's arguments object.
    fn parameters_schema(&self) -> Value;

    /// Run the tool with the given arguments.
    async fn execute(&self, args: Value) -> anyhow::Result<Value>;
}

/// Immutable name-to-tool mapping, built once at startup and passed by
/// reference to whoever needs it.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn with_tools(tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        Self {
            tools: tools
                .into_iter()
                .map(|tool| (tool.name().to_string(), tool))
                .collect(),
        }
    }

    /// The stock tool set: SerpAPI flight and hotel search.
    pub fn default_tools(config: &Config) -> Self {
        Self::with_tools([
            Arc::new(FlightsFinder::new(config.serpapi_api_key.clone())) as Arc<dyn Tool>,
            Arc::new(HotelsFinder::new(config.serpapi_api_key.clone())) as Arc<dyn Tool>,
        ])
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Schemas to advertise to the model, sorted by name so the
    /// advertised order is stable across runs.
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self
            .tools
            .values()
            .map(|tool| ToolSchema {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters_schema(),
            })
            .collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
