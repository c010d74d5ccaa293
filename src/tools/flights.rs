//! Flight search backed by SerpAPI's Google Flights engine.

use super::Tool;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const SEARCH_ENDPOINT: &str = "https://serpapi.com/search.json";

/// Round-trip flight lookup between two IATA airport codes.
pub struct FlightsFinder {
    api_key: String,
}

impl FlightsFinder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Tool for FlightsFinder {
    fn name(&self) -> &str {
        "flights_finder"
    }

    fn description(&self) -> &str {
        "Find round-trip flights using the Google Flights engine. Returns up to five of the best flight options with airlines, times, durations and prices in USD."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "departure_airport": {
                    "type": "string",
                    "description": "Departure airport code (IATA)"
                },
                "arrival_airport": {
                    "type": "string",
                    "description": "Arrival airport code (IATA)"
                },
                "outbound_date": {
                    "type": "string",
                    "description": "Outbound date. The format is YYYY-MM-DD. e.g. 2025-06-22"
                },
                "return_date": {
                    "type": "string",
                    "description": "Return date. The format is YYYY-MM-DD. e.g. 2025-06-28"
                },
                "adults": {
                    "type": "integer",
                    "description": "Number of adults. Defaults to 1."
                },
                "children": {
                    "type": "integer",
                    "description": "Number of children. Defaults to 0."
                },
                "infants_in_seat": {
                    "type": "integer",
                    "description": "Number of infants in seat. Defaults to 0."
                },
                "infants_on_lap": {
                    "type": "integer",
                    "description": "Number of infants on lap. Defaults to 0."
                }
            },
            "required": ["departure_airport", "arrival_airport", "outbound_date", "return_date"]
        })
    }

    async fn execute(&self, args: Value) -> anyhow::Result<Value> {
        let params = search_params(&args)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let response = client
            .get(SEARCH_ENDPOINT)
            .query(&[("api_key", self.api_key.as_str())])
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("search provider returned HTTP {}", status);
        }

        let data: Value = response.json().await?;
        extract_best_flights(data)
    }
}

fn search_params(args: &Value) -> anyhow::Result<Vec<(&'static str, String)>> {
    let departure = args["departure_airport"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing 'departure_airport' argument"))?;
    let arrival = args["arrival_airport"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing 'arrival_airport' argument"))?;
    let outbound_date = args["outbound_date"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing 'outbound_date' argument"))?;
    let return_date = args["return_date"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing 'return_date' argument"))?;

    Ok(vec![
        ("engine", "google_flights".to_string()),
        ("hl", "en".to_string()),
        ("gl", "us".to_string()),
        ("departure_id", departure.to_string()),
        ("arrival_id", arrival.to_string()),
        ("outbound_date", outbound_date.to_string()),
        ("return_date", return_date.to_string()),
        ("currency", "USD".to_string()),
        ("stops", "1".to_string()),
        ("adults", args["adults"].as_u64().unwrap_or(1).to_string()),
        ("children", args["children"].as_u64().unwrap_or(0).to_string()),
        (
            "infants_in_seat",
            args["infants_in_seat"].as_u64().unwrap_or(0).to_string(),
        ),
        (
            "infants_on_lap",
            args["infants_on_lap"].as_u64().unwrap_or(0).to_string(),
        ),
    ])
}

/// Pull the best-flights list out of a provider response, capped at five
/// entries.
fn extract_best_flights(data: Value) -> anyhow::Result<Value> {
    if let Some(error) = data.get("error").and_then(Value::as_str) {
        anyhow::bail!("{}", error);
    }
    let flights = data
        .get("best_flights")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow::anyhow!("no best_flights in provider response"))?;
    Ok(Value::Array(flights.iter().take(5).cloned().collect()))
}
