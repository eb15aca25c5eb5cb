//! Common helper functions for Vault operations.

use crate::vault::VaultError;
use reqwest::{Response, StatusCode};
use serde_json::Value;

/// Checks the HTTP response from Vault. If successful, returns the JSON body;
/// otherwise returns the status code together with Vault's error message.
pub async fn check_response(resp: Response) -> Result<Value, VaultError> {
    let status = resp.status();
    if status.is_success() {
        if status == StatusCode::NO_CONTENT {
            return Ok(serde_json::json!({}));
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::json!({}));
        }
        serde_json::from_str(&body)
            .map_err(|e| VaultError::ParseError(format!("Failed to parse response: {}", e)))
    } else {
        let body = resp.text().await.unwrap_or_default();
        Err(VaultError::HttpStatus(status.as_u16(), error_message(&body)))
    }
}

/// Extracts the `errors` list from a Vault error body, falling back to the raw body.
pub fn error_message(body: &str) -> String {
    if let Ok(val) = serde_json::from_str::<Value>(body) {
        if let Some(errors) = val.get("errors").and_then(|v| v.as_array()) {
            let messages: Vec<&str> = errors.iter().filter_map(|e| e.as_str()).collect();
            if !messages.is_empty() {
                return messages.join("; ");
            }
        }
    }
    body.to_string()
}

/// Reads a string out of the `data` section of a Vault response.
pub fn data_str(json: &Value, field: &str) -> Result<String, VaultError> {
    json.get("data")
        .and_then(|d| d.get(field))
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| VaultError::MissingField(format!("data.{}", field)))
}
