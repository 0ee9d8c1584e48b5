//! Request and response envelopes.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::{FrameId, RequestId, TabId};

use super::Command;

// ============================================================================
// Request
// ============================================================================

/// A command addressed to one tab and frame.
///
/// ```json
/// { "id": "uuid", "tabId": 1, "frameId": 0, "method": "element.subscribe", "params": { ... } }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// Correlates the request with its [`Response`].
    pub id: RequestId,

    /// Target tab.
    #[serde(rename = "tabId")]
    pub tab_id: TabId,

    /// Target frame (0 = main frame).
    #[serde(rename = "frameId")]
    pub frame_id: FrameId,

    /// Method and params.
    #[serde(flatten)]
    pub command: Command,
}

impl Request {
    /// Creates a request with a fresh id.
    #[inline]
    #[must_use]
    pub fn new(tab_id: TabId, frame_id: FrameId, command: Command) -> Self {
        Self {
            id: RequestId::generate(),
            tab_id,
            frame_id,
            command,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// Reply to a [`Request`], or the READY handshake (nil id).
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Success or error.
    #[serde(rename = "type")]
    pub response_type: ResponseType,

    /// Result data on success.
    #[serde(default)]
    pub result: Option<Value>,

    /// Error code on failure.
    #[serde(default)]
    pub error: Option<String>,

    /// Error message on failure.
    #[serde(default)]
    pub message: Option<String>,
}

impl Response {
    /// Passes a success response through unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] carrying the extension's message when the
    /// response is an error.
    pub fn check(self) -> Result<Self> {
        match self.response_type {
            ResponseType::Success => Ok(self),
            ResponseType::Error => {
                let code = self.error.unwrap_or_else(|| "unknown error".to_string());
                Err(Error::protocol(self.message.unwrap_or(code)))
            }
        }
    }

    /// String field of the result, empty when absent.
    #[inline]
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.field(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Numeric field of the result, 0 when absent.
    #[inline]
    #[must_use]
    pub fn get_u64(&self, key: &str) -> u64 {
        self.field(key).and_then(Value::as_u64).unwrap_or_default()
    }

    #[inline]
    fn field(&self, key: &str) -> Option<&Value> {
        self.result.as_ref().and_then(|v| v.get(key))
    }
}

// ============================================================================
// ResponseType
// ============================================================================

/// Response discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Command succeeded.
    Success,
    /// Command failed.
    Error,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ElementCommand;

    #[test]
    fn test_request_flattens_command() {
        let tab_id = TabId::new(3).expect("valid tab id");
        let request = Request::new(
            tab_id,
            FrameId::main(),
            Command::Element(ElementCommand::Subscribe {
                strategy: "id".into(),
                value: "vin_input".into(),
                one_shot: true,
                timeout: Some(60_000),
            }),
        );

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["tabId"], 3);
        assert_eq!(value["frameId"], 0);
        assert_eq!(value["method"], "element.subscribe");
        assert_eq!(value["params"]["value"], "vin_input");
        assert_eq!(value["params"]["oneShot"], true);
    }

    #[test]
    fn test_success_response_fields() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "success",
            "result": {"url": "https://driving-tests.org/vin-decoder/", "tabId": 7}
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        assert_eq!(response.response_type, ResponseType::Success);
        assert_eq!(response.get_string("url"), "https://driving-tests.org/vin-decoder/");
        assert_eq!(response.get_u64("tabId"), 7);
        assert_eq!(response.get_string("missing"), "");
        assert_eq!(response.get_u64("missing"), 0);
    }

    #[test]
    fn test_error_response_fails_check() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "error",
            "error": "no such element",
            "message": "Element not found"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        let err = response.check().expect_err("error response");
        assert!(err.to_string().contains("Element not found"));
    }

    #[test]
    fn test_error_without_message_uses_code() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "error",
            "error": "timeout"
        }"#;

        let response: Response = serde_json::from_str(json_str).expect("parse");
        let err = response.check().expect_err("error response");
        assert!(err.to_string().contains("timeout"));
    }
}
