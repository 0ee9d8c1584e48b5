//! Events pushed by the extension.
//!
//! The scraper only reacts to `element.added`, which resolves a pending
//! element wait. Everything else is parsed as [`ParsedEvent::Unknown`] and
//! ignored.

// ============================================================================
// Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;

use crate::identifiers::RequestId;

// ============================================================================
// Event
// ============================================================================

/// An event notification from the extension.
///
/// # Format
///
/// ```json
/// {
///   "id": "event-uuid",
///   "type": "event",
///   "method": "module.eventName",
///   "params": { ... }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    /// Event id.
    pub id: RequestId,

    /// Event type marker (always "event").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event name in `module.eventName` format.
    pub method: String,

    /// Event-specific data.
    #[serde(default)]
    pub params: Value,
}

impl Event {
    /// Parses the event into a typed variant.
    #[must_use]
    pub fn parse(&self) -> ParsedEvent {
        match self.method.as_str() {
            "element.added" => ParsedEvent::ElementAdded {
                strategy: self.get_string("strategy"),
                value: self.get_string("value"),
                element_id: self.get_string("elementId"),
                subscription_id: self.get_string("subscriptionId"),
            },
            _ => ParsedEvent::Unknown {
                method: self.method.clone(),
            },
        }
    }

    /// Gets a string from params, empty when missing.
    #[inline]
    fn get_string(&self, key: &str) -> String {
        self.params
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

// ============================================================================
// ParsedEvent
// ============================================================================

/// Typed view of an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedEvent {
    /// A subscribed locator matched an element.
    ElementAdded {
        /// Locator strategy.
        strategy: String,
        /// Locator value.
        value: String,
        /// Element handle.
        element_id: String,
        /// Subscription that fired.
        subscription_id: String,
    },

    /// Any event the scraper does not act on.
    Unknown {
        /// Event method.
        method: String,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_added_parsing() {
        let json_str = r##"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "event",
            "method": "element.added",
            "params": {
                "strategy": "id",
                "value": "vin_input",
                "elementId": "elem-123",
                "subscriptionId": "sub-456",
                "tabId": 1,
                "frameId": 0
            }
        }"##;

        let event: Event = serde_json::from_str(json_str).expect("parse event");
        assert_eq!(
            event.parse(),
            ParsedEvent::ElementAdded {
                strategy: "id".into(),
                value: "vin_input".into(),
                element_id: "elem-123".into(),
                subscription_id: "sub-456".into(),
            }
        );
    }

    #[test]
    fn test_unknown_event() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "event",
            "method": "browsingContext.load",
            "params": { "url": "https://driving-tests.org/vin-decoder/" }
        }"#;

        let event: Event = serde_json::from_str(json_str).expect("parse event");
        assert!(matches!(event.parse(), ParsedEvent::Unknown { method } if method == "browsingContext.load"));
    }

    #[test]
    fn test_missing_params_default_to_null() {
        let json_str = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "type": "event",
            "method": "element.added"
        }"#;

        let event: Event = serde_json::from_str(json_str).expect("parse event");
        match event.parse() {
            ParsedEvent::ElementAdded { element_id, .. } => assert!(element_id.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
