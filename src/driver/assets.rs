//! Startup page that hands the control address to the extension.
//!
//! Firefox opens this page as its first tab. The page posts a
//! `WEBDRIVER_INIT` message; the extension's content script relays it to the
//! background script, which then dials the loopback WebSocket server.

// ============================================================================
// Imports
// ============================================================================

use serde_json::json;

use crate::identifiers::SessionId;

// ============================================================================
// Constants
// ============================================================================

const INIT_HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>VIN Scraper</title>
</head>
<body>
    <p>Session $SESSION_ID connecting to $WS_URL</p>
    <script>window.postMessage($INIT_MESSAGE, '*');</script>
</body>
</html>"##;

// ============================================================================
// Functions
// ============================================================================

/// Builds the `data:text/html,...` URI Firefox is launched with.
#[must_use]
pub fn build_init_data_uri(ws_url: &str, session_id: &SessionId) -> String {
    let html = INIT_HTML_TEMPLATE
        .replace("$SESSION_ID", &session_id.to_string())
        .replace("$WS_URL", ws_url)
        .replace("$INIT_MESSAGE", &init_message(ws_url, session_id));

    format!("data:text/html,{}", urlencoding::encode(&html))
}

fn init_message(ws_url: &str, session_id: &SessionId) -> String {
    json!({
        "type": "WEBDRIVER_INIT",
        "wsUrl": ws_url,
        "sessionId": session_id.as_u32(),
    })
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
