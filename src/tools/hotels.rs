//! Hotel search backed by SerpAPI's Google Hotels engine.

use super::Tool;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

const SEARCH_ENDPOINT: &str = "https://serpapi.com/search.json";

/// Hotel lookup for a location and date range, sorted by rating.
pub struct HotelsFinder {
    api_key: String,
}

impl HotelsFinder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Tool for HotelsFinder {
    fn name(&self) -> &str {
        "hotels_finder"
    }

    fn description(&self) -> &str {
        "Find hotels using the Google Hotels engine. Returns up to five properties with rates, ratings and images, sorted by highest rating."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "q": {
                    "type": "string",
                    "description": "Location of the hotel"
                },
                "check_in_date": {
                    "type": "string",
                    "description": "Check-in date. The format is YYYY-MM-DD. e.g. 2025-06-22"
                },
                "check_out_date": {
                    "type": "string",
                    "description": "Check-out date. The format is YYYY-MM-DD. e.g. 2025-06-28"
                },
                "sort_by": {
                    "type": "string",
                    "description": "Sort order for results. Defaults to 8, highest rating."
                },
                "adults": {
                    "type": "integer",
                    "description": "Number of adults. Defaults to 1."
                },
                "children": {
                    "type": "integer",
                    "description": "Number of children. Defaults to 0."
                },
                "rooms": {
                    "type": "integer",
                    "description": "Number of rooms. Defaults to 1."
                },
                "hotel_class": {
                    "type": "string",
                    "description": "Restrict results to certain hotel classes, e.g. 2,3,4"
                }
            },
            "required": ["q", "check_in_date", "check_out_date"]
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
        extract_properties(data)
    }
}

fn search_params(args: &Value) -> anyhow::Result<Vec<(&'static str, String)>> {
    let location = args["q"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing 'q' argument"))?;
    let check_in_date = args["check_in_date"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing 'check_in_date' argument"))?;
    let check_out_date = args["check_out_date"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing 'check_out_date' argument"))?;

    let mut params = vec![
        ("engine", "google_hotels".to_string()),
        ("hl", "en".to_string()),
        ("gl", "us".to_string()),
        ("q", location.to_string()),
        ("check_in_date", check_in_date.to_string()),
        ("check_out_date", check_out_date.to_string()),
        ("currency", "USD".to_string()),
        ("adults", args["adults"].as_u64().unwrap_or(1).to_string()),
        ("children", args["children"].as_u64().unwrap_or(0).to_string()),
        ("rooms", args["rooms"].as_u64().unwrap_or(1).to_string()),
        (
            "sort_by",
            args["sort_by"].as_str().unwrap_or("8").to_string(),
        ),
    ];
    // The model sometimes passes hotel_class as a bare number.
    match &args["hotel_class"] {
        Value::String(class) => params.push(("hotel_class", class.clone())),
        Value::Number(class) => params.push(("hotel_class", class.to_string())),
        _ => {}
    }
    Ok(params)
}

/// Pull the property list out of a provider response, capped at five
/// entries.
fn extract_properties(data: Value) -> anyhow::Result<Value> {
    if let Some(error) = data.get("error").and_then(Value::as_str) {
        anyhow::bail!("{}", error);
    }
    let properties = data
        .get("properties")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow::anyhow!("no properties in provider response"))?;
    Ok(Value::Array(properties.iter().take(5).cloned().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_args() -> Value {
        json!({
            "q": "Alappuzha, Kerala",
            "check_in_date": "2026-11-10",
            "check_out_date": "2026-11-15"
        })
    }

    #[test]
    fn params_require_location_and_dates() {
        let err = search_params(&json!({})).unwrap_err();
        assert!(err.to_string().contains("'q'"));

        let err = search_params(&json!({"q": "Paris", "check_in_date": "2026-11-10"})).unwrap_err();
        assert!(err.to_string().contains("check_out_date"));
    }

    #[test]
    fn params_default_to_highest_rating_sort() {
        let params = search_params(&minimal_args()).expect("params");
        assert!(params.contains(&("engine", "google_hotels".to_string())));
        assert!(params.contains(&("sort_by", "8".to_string())));
        assert!(params.contains(&("adults", "1".to_string())));
        assert!(params.contains(&("rooms", "1".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "hotel_class"));
    }

    #[test]
    fn params_accept_hotel_class_as_string_or_number() {
        let mut args = minimal_args();
        args["hotel_class"] = json!("3,4");
        let params = search_params(&args).expect("params");
        assert!(params.contains(&("hotel_class", "3,4".to_string())));

        args["hotel_class"] = json!(4);
        let params = search_params(&args).expect("params");
        assert!(params.contains(&("hotel_class", "4".to_string())));
    }

    #[test]
    fn extract_caps_results_at_five() {
        let properties: Vec<Value> = (0..7).map(|i| json!({"name": format!("Hotel {i}")})).collect();
        let result = extract_properties(json!({ "properties": properties })).expect("extract");
        assert_eq!(result.as_array().map(Vec::len), Some(5));
        assert_eq!(result[4]["name"], "Hotel 4");
    }

    #[test]
    fn extract_surfaces_provider_errors() {
        let err = extract_properties(json!({"error": "Invalid API key"})).unwrap_err();
        assert_eq!(err.to_string(), "Invalid API key");
    }
}
