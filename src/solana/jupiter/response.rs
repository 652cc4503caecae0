use log::error;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::entity::SwapError;

// Error body returned by the Jupiter API
#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Decode a JSON body, turning a Jupiter `{"error": ...}` body into an API error.
pub fn parse_api_value<T>(value: Value) -> Result<T, SwapError>
where
    T: DeserializeOwned,
{
    if let Ok(ErrorResponse { error }) = serde_json::from_value::<ErrorResponse>(value.clone()) {
        Err(SwapError::Api(error))
    } else {
        serde_json::from_value(value)
            .map_err(|err| SwapError::MalformedResponse(format!("JSON deserialization error: {}", err)))
    }
}

/// Read a Jupiter response, mapping HTTP failures and error bodies.
pub async fn read_api_response<T>(response: Response, context: &str) -> Result<T, SwapError>
where
    T: DeserializeOwned,
{
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("Jupiter API error [{}]: {} {}", context, status, error_text);

        let message = serde_json::from_str::<ErrorResponse>(&error_text)
            .map(|body| body.error)
            .unwrap_or(error_text);
        return Err(SwapError::Api(format!("{} ({})", message, status)));
    }

    let json_value = response
        .json::<Value>()
        .await
        .map_err(|e| SwapError::MalformedResponse(format!("Failed to parse response as JSON: {}", e)))?;

    parse_api_value(json_value)
}
