//! Tool invocation executor.
//!
//! Tool failures are data, not control flow: every call yields a tool
//! result entry, and a failure description re-enters the conversation so
//! the model can correct itself on the next decision.

use crate::conversation::{Message, ToolCall};
use crate::tools::ToolRegistry;
use serde_json::Value;

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Run one decision's tool calls and return their result entries.
///
/// Result order always matches call order, whether or not the batch runs
/// in parallel.
pub async fn run_tool_batch(
    registry: &ToolRegistry,
    calls: &[ToolCall],
    parallel: bool,
) -> Vec<Message> {
    if parallel {
        futures::future::join_all(calls.iter().map(|call| run_single_call(registry, call))).await
    } else {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(run_single_call(registry, call).await);
        }
        results
    }
}

async fn run_single_call(registry: &ToolRegistry, call: &ToolCall) -> Message {
    tracing::info!(tool = %call.name, args = %call.arguments, "calling tool");

    let content = match registry.lookup(&call.name) {
        None => {
            tracing::warn!(tool = %call.name, "invalid tool name requested");
            "Invalid tool name, retry".to_string()
        }
        Some(tool) => match tool.execute(call.arguments.clone()).await {
            Ok(mut result) => {
                normalize_display_images(&mut result);
                result.to_string()
            }
            Err(error) => {
                tracing::warn!(tool = %call.name, %error, "tool failed");
                format!("Tool {} failed: {}", call.name, error)
            }
        },
    };

    Message::tool(call.id.clone(), call.name.clone(), content)
}

/// Ensure every result item carries a usable `image_url`, falling back to
/// its thumbnail, its full image, then a placeholder.
fn normalize_display_images(result: &mut Value) {
    let Some(items) = result.as_array_mut() else {
        return;
    };
    for item in items {
        let Some(entry) = item.as_object_mut() else {
            continue;
        };
        if entry.get("image_url").and_then(Value::as_str).is_some() {
            continue;
        }
        let image = entry
            .get("thumbnail")
            .and_then(Value::as_str)
            .or_else(|| entry.get("image").and_then(Value::as_str))
            .unwrap_or(PLACEHOLDER_IMAGE)
            .to_string();
        entry.insert("image_url".to_string(), Value::String(image));
    }
}
