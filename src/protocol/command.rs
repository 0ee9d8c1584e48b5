//! Commands sent to the extension.
//!
//! Each command serializes as `{"method": "module.methodName", "params": {...}}`
//! and is flattened into a [`Request`](super::Request).
//!
//! | Module | Commands used by the scraper |
//! |--------|------------------------------|
//! | `browsingContext` | navigate, getUrl, closeTab |
//! | `element` | getProperty, subscribe |
//! | `script` | evaluate |
//! | `input` | typeKey, typeText |
//! | `proxy` | setWindowProxy |

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::identifiers::ElementId;

// ============================================================================
// Command Wrapper
// ============================================================================

/// All protocol commands, grouped by extension module.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Command {
    /// BrowsingContext module commands.
    BrowsingContext(BrowsingContextCommand),
    /// Element module commands.
    Element(ElementCommand),
    /// Script module commands.
    Script(ScriptCommand),
    /// Input module commands.
    Input(InputCommand),
    /// Proxy module commands.
    Proxy(ProxyCommand),
}

// ============================================================================
// BrowsingContext Commands
// ============================================================================

/// Navigation and tab lifecycle.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum BrowsingContextCommand {
    /// Navigate to URL.
    #[serde(rename = "browsingContext.navigate")]
    Navigate {
        /// URL to navigate to.
        url: String,
    },

    /// Get current URL.
    #[serde(rename = "browsingContext.getUrl")]
    GetUrl,

    /// Close current tab.
    #[serde(rename = "browsingContext.closeTab")]
    CloseTab,
}

// ============================================================================
// Element Commands
// ============================================================================

/// DOM lookups and element observation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum ElementCommand {
    /// Read `element[name]`.
    #[serde(rename = "element.getProperty")]
    GetProperty {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Property name.
        name: String,
    },

    /// Report when a matching element exists or appears.
    #[serde(rename = "element.subscribe")]
    Subscribe {
        /// Locator strategy.
        strategy: String,
        /// Locator value.
        value: String,
        /// Auto-unsubscribe after first match.
        #[serde(rename = "oneShot")]
        one_shot: bool,
        /// Extension-side expiry in milliseconds.
        #[serde(skip_serializing_if = "Option::is_none")]
        timeout: Option<u64>,
    },
}

// ============================================================================
// Script Commands
// ============================================================================

/// JavaScript execution.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum ScriptCommand {
    /// Execute synchronous script.
    #[serde(rename = "script.evaluate")]
    Evaluate {
        /// JavaScript code.
        script: String,
        /// Script arguments.
        args: Vec<Value>,
    },
}

// ============================================================================
// Input Commands
// ============================================================================

/// Keyboard simulation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum InputCommand {
    /// Dispatch one key.
    #[serde(rename = "input.typeKey")]
    TypeKey {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Key value (e.g., "Enter").
        key: String,
        /// Key code (e.g., "Enter").
        code: String,
        /// Legacy keyCode number.
        #[serde(rename = "keyCode")]
        key_code: u32,
        /// Is printable character.
        printable: bool,
    },

    /// Type text character by character.
    #[serde(rename = "input.typeText")]
    TypeText {
        /// Element ID.
        #[serde(rename = "elementId")]
        element_id: ElementId,
        /// Text to type.
        text: String,
    },
}

// ============================================================================
// Proxy Commands
// ============================================================================

/// Window-level proxy.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum ProxyCommand {
    /// Route the window through a proxy.
    #[serde(rename = "proxy.setWindowProxy")]
    SetWindowProxy {
        /// Proxy type (`http`).
        #[serde(rename = "type")]
        proxy_type: String,
        /// Proxy host.
        host: String,
        /// Proxy port.
        port: u16,
        /// Username (optional).
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<String>,
        /// Password (optional).
        #[serde(skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },
}

// ============================================================================
// Tests
// ============================================================================
