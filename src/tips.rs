use std::time::Duration;

use serde_json::json;
use ureq::Agent;

use crate::error::{MaziwaError, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Inputs for one tips generation call. The test and agricultural data
/// fields are free-form JSON strings interpolated into the prompt.
pub struct TipsRequest<'a> {
    pub farmer_id: &'a str,
    pub previous_milk_tests: &'a str,
    pub local_agricultural_data: &'a str,
}

fn build_prompt(request: &TipsRequest) -> String {
    format!(
        "You are an AI assistant providing personalized advice to dairy farmers to improve their milk production.\n\
         \n\
         Based on the farmer's previous milk test data and local agricultural data, generate a few actionable tips \
         that the farmer can use to improve milk production practices.\n\
         \n\
         Farmer ID: {}\n\
         Previous Milk Tests: {}\n\
         Local Agricultural Data: {}\n\
         \n\
         Tips:\n",
        request.farmer_id, request.previous_milk_tests, request.local_agricultural_data
    )
}

/// Call the generative-text provider and return the tips text.
/// One request, no retries, no streaming; any failure (network, HTTP
/// status, unexpected response shape) surfaces as a single error.
pub fn generate_tips(request: &TipsRequest, model: &str, api_key: &str) -> Result<String> {
    let agent: Agent = Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .into();

    let body = json!({
        "contents": [{
            "parts": [{ "text": build_prompt(request) }]
        }]
    });

    let url = format!("{API_BASE}/{model}:generateContent");
    let response: String = agent
        .post(&url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .send(body.to_string())
        .map_err(|e| MaziwaError::TipsRequest(e.to_string()))?
        .body_mut()
        .read_to_string()
        .map_err(|e| MaziwaError::TipsRequest(e.to_string()))?;

    let parsed: serde_json::Value =
        serde_json::from_str(&response).map_err(|e| MaziwaError::TipsRequest(e.to_string()))?;

    parsed["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| MaziwaError::TipsRequest("response contained no tips text".to_string()))
}
