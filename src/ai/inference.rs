use reqwest::Response;
use serde::{Deserialize, Serialize};

use super::GatewayError;

pub const GENERATE_ENDPOINT: &str = "/api/generate";

// Sampling pinned low so the model sticks to the instructed category tokens.
const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.9;

pub fn build_request(model: &str, prompt: &str) -> GenerateRequest {
    GenerateRequest {
        model: model.to_string(),
        prompt: prompt.to_string(),
        stream: false,
        options: SamplingOptions {
            temperature: TEMPERATURE,
            top_p: TOP_P,
        },
    }
}

/// Extracts the completion text verbatim; trimming happens where the
/// outcome is recorded.
pub async fn parse_response(response: Response) -> Result<String, GatewayError> {
    let body: GenerateResponse = response
        .json()
        .await
        .map_err(|err| GatewayError::Decode(err.to_string()))?;
    Ok(body.response.unwrap_or_default())
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: SamplingOptions,
}

#[derive(Debug, Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    pub response: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_is_non_streaming() {
        let request = build_request("phi3", "classify this");
        assert_eq!(request.model, "phi3");
        assert_eq!(request.prompt, "classify this");
        assert!(!request.stream);
    }

    #[test]
    fn request_serializes_sampling_options() {
        let request = build_request("phi3", "p");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], serde_json::json!(false));
        assert!(value["options"]["temperature"].as_f64().unwrap() < 0.2);
        assert!(value["options"]["top_p"].as_f64().is_some());
    }

    #[test]
    fn response_with_missing_text_decodes_to_empty() {
        let body: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.response.unwrap_or_default(), "");
    }
}
